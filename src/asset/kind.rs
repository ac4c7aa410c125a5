//! Asset kind definitions.

use std::path::Path;

/// How a source file is transformed, decided by its extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// `.js`: minified, guarded, possibly renamed.
    Script,
    /// `.html` / `.htm`: script references rewritten, minified.
    Markup,
    /// `.css`: whitespace and comments stripped.
    Style,
    /// Anything else: copied byte for byte.
    Other,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Other;
        };
        match ext.to_ascii_lowercase().as_str() {
            "js" => Self::Script,
            "html" | "htm" => Self::Markup,
            "css" => Self::Style,
            _ => Self::Other,
        }
    }

    /// Log prefix for this kind.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Markup => "html",
            Self::Style => "css",
            Self::Other => "copy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(AssetKind::from_path(Path::new("a.js")), AssetKind::Script);
        assert_eq!(AssetKind::from_path(Path::new("x/INDEX.HTML")), AssetKind::Markup);
        assert_eq!(AssetKind::from_path(Path::new("page.htm")), AssetKind::Markup);
        assert_eq!(AssetKind::from_path(Path::new("style.Css")), AssetKind::Style);
        assert_eq!(AssetKind::from_path(Path::new("logo.png")), AssetKind::Other);
        assert_eq!(AssetKind::from_path(Path::new("Makefile")), AssetKind::Other);
        assert_eq!(AssetKind::from_path(Path::new("app.mjs")), AssetKind::Other);
    }
}
