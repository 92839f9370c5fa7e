//! Preflight Check System
//!
//! Verifies the data folders and every trained artifact before the session
//! starts. Nothing is assumed; a failed critical check blocks startup.

use crate::config::AppConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub ready_to_start: bool,
    pub summary: String,
}

impl PreflightReport {
    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Performs all preflight checks and returns a report
pub fn run_preflight_checks(config: &AppConfig) -> PreflightReport {
    info!("Running preflight checks");

    let mut checks = vec![check_directories(config)];
    checks.push(check_artifact("model_file", &config.model_path));
    checks.push(check_artifact("words_file", &config.words_path));
    checks.push(check_artifact("classes_file", &config.classes_path));
    checks.push(check_artifact("intents_file", &config.intents_path));
    if let Some(path) = &config.lexicon_path {
        checks.push(check_artifact("lexicon_file", path));
    }
    if let Some(path) = &config.exceptions_path {
        checks.push(check_artifact("exceptions_file", path));
    }

    let all_passed = checks.iter().all(|c| c.passed);
    let critical_passed = checks
        .iter()
        .filter(|c| is_critical_check(&c.name))
        .all(|c| c.passed);

    let summary = if all_passed {
        "All checks passed. System ready.".to_string()
    } else if critical_passed {
        "Some non-critical checks failed. System can start with warnings.".to_string()
    } else {
        "Critical checks failed. System cannot start.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  ok {}: {}", check.name, check.message);
        } else {
            warn!("  FAILED {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }
    info!("Summary: {}", summary);

    PreflightReport {
        all_passed,
        checks,
        ready_to_start: critical_passed,
        summary,
    }
}

fn is_critical_check(name: &str) -> bool {
    matches!(
        name,
        "model_file"
            | "words_file"
            | "classes_file"
            | "intents_file"
            | "lexicon_file"
            | "exceptions_file"
    )
}

// --- Individual Checks ---

fn check_directories(config: &AppConfig) -> CheckResult {
    let dirs = [
        ("data", config.data_dir.clone()),
        ("transcripts", config.transcripts_dir()),
    ];

    let mut missing = Vec::new();
    let mut created = Vec::new();

    for (name, path) in &dirs {
        if !path.exists() {
            match std::fs::create_dir_all(path) {
                Ok(_) => created.push(*name),
                Err(e) => missing.push(format!("{}: {}", name, e)),
            }
        }
    }

    if missing.is_empty() {
        if created.is_empty() {
            CheckResult::pass("directories", "All directories exist")
        } else {
            CheckResult::pass(
                "directories",
                &format!("Created missing directories: {}", created.join(", ")),
            )
        }
    } else {
        CheckResult::fail(
            "directories",
            "Failed to create directories",
            Some(missing.join(", ")),
        )
    }
}

fn check_artifact(name: &str, path: &Path) -> CheckResult {
    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_file() => {
            CheckResult::fail(name, "Not a regular file", Some(format!("Path: {:?}", path)))
        }
        Ok(meta) if meta.len() == 0 => {
            CheckResult::fail(name, "Artifact file is empty", Some(format!("Path: {:?}", path)))
        }
        Ok(meta) => CheckResult::pass(name, &format!("Found ({} bytes)", meta.len())),
        Err(e) => CheckResult::fail(
            name,
            "Artifact file not found",
            Some(format!("Expected at {:?}: {}", path, e)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::write_artifacts;
    use std::fs;

    #[test]
    fn test_all_checks_pass_with_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path());

        let report = run_preflight_checks(&config);
        assert!(report.all_passed, "{:?}", report.checks);
        assert!(report.ready_to_start);
        assert!(config.transcripts_dir().exists());
    }

    #[test]
    fn test_missing_model_blocks_start() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path());
        fs::remove_file(&config.model_path).unwrap();

        let report = run_preflight_checks(&config);
        assert!(!report.ready_to_start);
        let failed: Vec<_> = report.failed_checks().map(|c| c.name.as_str()).collect();
        assert_eq!(failed, vec!["model_file"]);
    }

    #[test]
    fn test_empty_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path());
        fs::write(&config.intents_path, "").unwrap();

        let report = run_preflight_checks(&config);
        assert!(!report.ready_to_start);
        assert!(report.summary.contains("Critical"));
    }

    #[test]
    fn test_configured_lexicon_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_artifacts(dir.path());
        config.lexicon_path = Some(dir.path().join("missing_lexicon.json"));

        let report = run_preflight_checks(&config);
        assert!(report.checks.iter().any(|c| c.name == "lexicon_file" && !c.passed));
    }

    #[test]
    fn test_configured_exceptions_file_is_critical() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_artifacts(dir.path());
        config.exceptions_path = Some(dir.path().join("missing_exceptions.json"));

        let report = run_preflight_checks(&config);
        assert!(!report.ready_to_start);
        let failed: Vec<_> = report.failed_checks().map(|c| c.name.as_str()).collect();
        assert_eq!(failed, vec!["exceptions_file"]);
    }
}
