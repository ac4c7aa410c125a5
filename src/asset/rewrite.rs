//! Rewrite HTML `src` attributes to obfuscated script names.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::obfuscate::NameMap;

/// `src="…"` or `src='…'`, attribute name case-insensitive.
static RE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(src\s*=\s*)(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Replace every `src` value whose last path segment is a renamed file.
///
/// `src="js/app.js"` becomes `src="js/3f2a9c1e.js"`; the path prefix and the
/// quote style are kept. Values naming files without a mapping are untouched.
pub fn rewrite_script_refs<'a>(html: &'a str, names: &NameMap) -> Cow<'a, str> {
    if names.is_empty() {
        return Cow::Borrowed(html);
    }

    RE_SRC.replace_all(html, |caps: &Captures| {
        let (value, quote) = match (caps.get(2), caps.get(3)) {
            (Some(v), _) => (v.as_str(), '"'),
            (None, Some(v)) => (v.as_str(), '\''),
            (None, None) => return caps[0].to_string(),
        };

        let (prefix, file_name) = match value.rfind('/') {
            Some(i) => value.split_at(i + 1),
            None => ("", value),
        };

        match names.get(file_name) {
            Some(renamed) => format!("{}{quote}{prefix}{renamed}{quote}", &caps[1]),
            None => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> NameMap {
        let mut names = NameMap::new();
        names.insert("a.js", "0123abcd.js");
        names.insert("app.js", "deadbeef.js");
        names
    }

    #[test]
    fn test_rewrite_single_quotes() {
        let html = "<script src='a.js'></script>";
        assert_eq!(
            rewrite_script_refs(html, &names()),
            "<script src='0123abcd.js'></script>"
        );
    }

    #[test]
    fn test_rewrite_double_quotes_with_prefix() {
        let html = r#"<script src="/static/js/app.js" defer></script>"#;
        assert_eq!(
            rewrite_script_refs(html, &names()),
            r#"<script src="/static/js/deadbeef.js" defer></script>"#
        );
    }

    #[test]
    fn test_rewrite_all_occurrences() {
        let html = r#"<script src="a.js"></script><script SRC = "app.js"></script>"#;
        assert_eq!(
            rewrite_script_refs(html, &names()),
            r#"<script src="0123abcd.js"></script><script SRC = "deadbeef.js"></script>"#
        );
    }

    #[test]
    fn test_unmapped_untouched() {
        let html = r#"<script src="vendor.js"></script><img src="a.png">"#;
        assert_eq!(rewrite_script_refs(html, &names()), html);
    }

    #[test]
    fn test_suffix_without_separator_untouched() {
        // `data.js` ends with `a.js` but is a different file
        let html = r#"<script src="data.js"></script>"#;
        assert_eq!(rewrite_script_refs(html, &names()), html);
    }

    #[test]
    fn test_data_src_rewritten() {
        let html = r#"<img data-src="a.js">"#;
        // word boundary between `-` and `s`
        assert_eq!(rewrite_script_refs(html, &names()), r#"<img data-src="0123abcd.js">"#);
    }

    #[test]
    fn test_empty_map_borrows() {
        let html = "<script src='a.js'></script>";
        assert!(matches!(
            rewrite_script_refs(html, &NameMap::new()),
            Cow::Borrowed(_)
        ));
    }
}
