use std::path::PathBuf;
use tracing::warn;

pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root directory (the folder holding the executable).
    pub fn root_dir() -> PathBuf {
        #[cfg(debug_assertions)]
        {
            // In development the executable sits in target/debug at the workspace root,
            // while the data folder lives next to apps/core.
            if let Ok(mut path) = std::env::current_exe() {
                path.pop(); // exe name
                path.pop(); // debug
                path.pop(); // target

                let core_path = path.join("apps").join("core");
                if core_path.exists() {
                    return core_path;
                }
                return path;
            }
        }

        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                warn!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Main data directory (./data). Trained artifacts live in ./data/models.
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }
}
