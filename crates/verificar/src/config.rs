//! Run configuration.
//!
//! There is no configuration file and there are no flags: every value has a
//! fixture default and the entry points run with `VerifyConfig::default()`.
//! The account names and the dropdown trigger text are configuration rather
//! than literals because their correctness depends entirely on the test
//! fixture under verification.

use std::path::PathBuf;

/// Configuration for a verification run.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Address the application under test is already serving on
    pub app_url: String,
    /// Sample data file fed into the file-input control
    pub csv_path: PathBuf,
    /// Account name expected when column mapping succeeded
    pub mapped_account: String,
    /// Account name selected by the custom-dropdown fallback
    pub fallback_account: String,
    /// Visible text of the custom account-dropdown trigger
    pub dropdown_trigger: String,
    /// Directory screenshot artifacts are written to
    pub artifact_dir: PathBuf,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            app_url: String::from("http://localhost:5173"),
            csv_path: PathBuf::from("test.csv"),
            mapped_account: String::from("MyBank"),
            fallback_account: String::from("RBC Checking"),
            dropdown_trigger: String::from("Select account"),
            artifact_dir: PathBuf::from("verification"),
        }
    }
}

impl VerifyConfig {
    /// Create a configuration with fixture defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application URL
    #[must_use]
    pub fn with_app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = url.into();
        self
    }

    /// Set the sample CSV path
    #[must_use]
    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }

    /// Set the account name expected from a successful mapping
    #[must_use]
    pub fn with_mapped_account(mut self, name: impl Into<String>) -> Self {
        self.mapped_account = name.into();
        self
    }

    /// Set the fallback account name for the custom dropdown
    #[must_use]
    pub fn with_fallback_account(mut self, name: impl Into<String>) -> Self {
        self.fallback_account = name.into();
        self
    }

    /// Set the artifact output directory
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixture() {
        let cfg = VerifyConfig::default();
        assert_eq!(cfg.app_url, "http://localhost:5173");
        assert_eq!(cfg.csv_path, PathBuf::from("test.csv"));
        assert_eq!(cfg.mapped_account, "MyBank");
        assert_eq!(cfg.fallback_account, "RBC Checking");
        assert_eq!(cfg.dropdown_trigger, "Select account");
        assert_eq!(cfg.artifact_dir, PathBuf::from("verification"));
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = VerifyConfig::new()
            .with_app_url("http://localhost:9999")
            .with_fallback_account("Other Bank")
            .with_artifact_dir("/tmp/shots");
        assert_eq!(cfg.app_url, "http://localhost:9999");
        assert_eq!(cfg.fallback_account, "Other Bank");
        assert_eq!(cfg.artifact_dir, PathBuf::from("/tmp/shots"));
    }
}
