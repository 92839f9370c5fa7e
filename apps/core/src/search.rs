//! Web search side effect for the `search <query>` command.

use crate::error::AppError;
use std::process::{Command, Stdio};
use tracing::{info, warn};
use url::Url;

/// `base?q=<query>` with the query form-encoded.
pub fn build_search_url(base: &str, query: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

/// Opens URLs in the user's default browser.
#[derive(Debug, Clone)]
pub struct SystemBrowser {
    base_url: String,
}

impl SystemBrowser {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Builds the search URL and hands it to the platform opener.
    pub fn open_search(&self, query: &str) -> Result<Url, AppError> {
        let url = build_search_url(&self.base_url, query)?;
        let mut command = opener_command(url.as_str())?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                warn!("Failed to launch browser: {}", e);
                AppError::Io(e)
            })?;
        info!("Opened web search: {}", url);
        Ok(url)
    }
}

fn opener_command(target: &str) -> Result<Command, AppError> {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", target]);
        return Ok(command);
    }

    let program = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let path = which::which(program)?;
    let mut command = Command::new(path);
    command.arg(target);
    Ok(command)
}
