//! Asset minification for JS, HTML and CSS.
//!
//! Uses oxc for JavaScript and minify-html for HTML. CSS gets a plain
//! comment/whitespace strip that cannot fail.

use std::sync::LazyLock;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, CompressOptionsUnused, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use regex::Regex;
use thiserror::Error;

/// Why a file could not be minified. Never fatal: callers keep the original.
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("input is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("{count} parse error(s), first: {first}")]
    Parse { count: usize, first: String },

    #[error("minifier produced invalid UTF-8")]
    Output,
}

/// Minify JavaScript source code.
///
/// Drops dead code, `console.*` calls and `debugger` statements, mangles
/// top-level names and strips comments. Sources are classic scripts: unused
/// top-level declarations are kept and directive prologues survive.
pub fn minify_js(source: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    let source_type = SourceType::cjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(first) = ret.errors.first() {
        return Err(MinifyError::Parse {
            count: ret.errors.len(),
            first: first.to_string(),
        });
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(true),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions {
            drop_console: true,
            drop_debugger: true,
            unused: CompressOptionsUnused::Keep,
            ..CompressOptions::smallest()
        }),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify HTML: collapse whitespace, drop comments, minify inline `<script>`/`<style>`.
pub fn minify_html(source: &[u8]) -> Result<Vec<u8>, MinifyError> {
    std::str::from_utf8(source)?;

    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    let out = minify_html::minify(source, &cfg);

    if std::str::from_utf8(&out).is_err() {
        return Err(MinifyError::Output);
    }
    Ok(out)
}

/// Minify CSS source code.
///
/// Strips block comments, collapses whitespace runs to one space, removes
/// whitespace around `{ } : ; ,` and trims. Idempotent.
pub fn minify_css(source: &str) -> String {
    static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
    static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
    static RE_PUNCT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s*([{}:;,])\s*").unwrap());

    let css = RE_COMMENT.replace_all(source, "");
    let css = RE_SPACE.replace_all(&css, " ");
    let css = RE_PUNCT.replace_all(&css, "$1");
    css.trim().to_string()
}
