//! Embedded static resources.
//!
//! - `template` - Template types for typed variable injection
//! - `script` - JavaScript snippets injected into build outputs
//!
//! # Usage
//!
//! ```ignore
//! use embed::script::{GUARD_JS, GuardVars};
//!
//! let snippet = GUARD_JS.render(&GuardVars::from_config(&config.build.guard));
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod script {
    use super::{Template, TemplateVars};
    use crate::config::GuardConfig;
    use serde_json::Value;

    /// Variables for the domain-lock guard.
    ///
    /// Every value is substituted as a JSON literal, so quotes and
    /// backslashes in the config can never break out of the script.
    pub struct GuardVars {
        pub domains: Vec<String>,
        pub platform_suffix: String,
        pub message: String,
    }

    impl GuardVars {
        pub fn from_config(guard: &GuardConfig) -> Self {
            Self {
                domains: guard.domains.clone(),
                platform_suffix: guard.platform_suffix.clone(),
                message: guard.message.clone(),
            }
        }
    }

    impl TemplateVars for GuardVars {
        fn apply(&self, content: &str) -> String {
            let domains = Value::from(self.domains.clone()).to_string();
            let suffix = Value::from(self.platform_suffix.as_str()).to_string();
            let message = Value::from(self.message.as_str()).to_string();
            content
                .replace("__ALLOWED_DOMAINS__", &domains)
                .replace("__PLATFORM_SUFFIX__", &suffix)
                .replace("__MESSAGE__", &message)
        }
    }

    /// Self-invoking domain lock prepended to every script output.
    pub const GUARD_JS: Template<GuardVars> =
        Template::new(include_str!("script/guard.js"));

}
