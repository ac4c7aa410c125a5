//! Config field path used to point diagnostics at a `sitepack.toml` key.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `build.stage.extension`.
///
/// # Example
///
/// ```ignore
/// diag.error(FieldPath::new("build.output"), "must not contain the source root");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
