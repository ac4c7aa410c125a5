//! `[build.guard]` section: domain lock injected into every script.
//!
//! # Example
//!
//! ```toml
//! [build.guard]
//! domains = ["example.com"]          # empty list disables the guard
//! platform_suffix = ".github.io"     # hosting previews that are always allowed
//! message = "Unauthorized Access"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Hostnames (and their subdomains) the scripts may run on.
    pub domains: Vec<String>,
    /// Hostname suffix of a hosting platform that is always allowed.
    pub platform_suffix: String,
    /// Text shown in place of the page when the host is not allowed.
    pub message: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            domains: vec![],
            platform_suffix: ".github.io".into(),
            message: "Unauthorized Access".into(),
        }
    }
}

impl GuardConfig {
    pub fn is_enabled(&self) -> bool {
        !self.domains.is_empty()
    }

    /// Lowercase and trim domains, dropping a leading `.`.
    pub fn normalize(&mut self) {
        for domain in &mut self.domains {
            *domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
        }
        let mut seen = FxHashSet::default();
        self.domains.retain(|d| seen.insert(d.clone()));
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for domain in &self.domains {
            if domain.is_empty() {
                diag.error(FieldPath::new("build.guard.domains"), "empty domain");
            } else if domain.contains("://") {
                diag.error_with_hint(
                    FieldPath::new("build.guard.domains"),
                    format!("`{domain}` contains a scheme"),
                    "use the bare hostname, e.g. \"example.com\"",
                );
            } else if domain.contains(['/', ' ', '\t']) {
                diag.error(
                    FieldPath::new("build.guard.domains"),
                    format!("`{domain}` is not a hostname"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(!config.build.guard.is_enabled());
        assert_eq!(config.build.guard.platform_suffix, ".github.io");
        assert_eq!(config.build.guard.message, "Unauthorized Access");
    }

    #[test]
    fn test_normalize() {
        let mut guard = GuardConfig {
            domains: vec![" Example.COM ".into(), ".example.org".into(), "example.com".into()],
            ..GuardConfig::default()
        };
        guard.normalize();
        assert_eq!(guard.domains, vec!["example.com", "example.org"]);
    }

    #[test]
    fn test_validate_rejects_urls() {
        let guard = GuardConfig {
            domains: vec!["https://example.com".into(), "a b".into(), String::new()],
            ..GuardConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        guard.validate(&mut diag);
        assert_eq!(diag.errors().len(), 3);
    }

    #[test]
    fn test_validate_accepts_hostnames() {
        let guard = GuardConfig {
            domains: vec!["example.com".into(), "cdn.example.org".into()],
            ..GuardConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        guard.validate(&mut diag);
        assert!(!diag.has_errors());
    }
}
