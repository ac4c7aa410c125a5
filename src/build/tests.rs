//! End-to-end build tests over scratch source trees.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use tempfile::TempDir;
use walkdir::WalkDir;

use super::*;
use crate::config::test_config_for;
use crate::utils::path::to_slash;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Relative path → bytes for every file under `root`.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = to_slash(e.path().strip_prefix(root).unwrap());
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

fn files(root: &Path) -> Vec<String> {
    snapshot(root).into_keys().collect()
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// First `src` attribute value in `html`.
fn first_src(html: &str) -> String {
    let re = Regex::new(r#"src=["']([^"']*)["']"#).unwrap();
    re.captures(html).unwrap()[1].to_string()
}

fn sample_site(root: &Path) {
    write(root, "index.html", "<html>\n<body>\n  <script src=\"js/app.js\"></script>\n</body>\n</html>\n");
    write(root, "js/app.js", "function greet(name) {\n  return 'hi ' + name;\n}\ngreet('x');\n");
    write(root, "css/site.css", "body {\n  margin : 0 ;\n}\n");
    write(root, "img/logo.png", "\u{89}PNG");
    write(root, "node_modules/pkg/index.js", "module.exports = 1;");
    write(root, "data/llm/facts.json", "{\"a\": 1}");
    write(root, "data/llm/paper.pdf", "%PDF");
    write(root, "data/pdf/other.json", "{}");
    write(root, "sitepack.toml", "");
    write(root, "img/.DS_Store", "");
}

#[test]
fn test_output_mirrors_source() {
    let dir = TempDir::new().unwrap();
    sample_site(dir.path());
    let config = test_config_for(dir.path(), "[build]\nminify = false");

    let stats = build_site(&config).unwrap();

    assert_eq!(
        files(&config.build.output),
        [
            "css/site.css",
            "data/llm/facts.json",
            "img/logo.png",
            "index.html",
            "js/app.js",
        ]
    );
    assert_eq!(
        stats,
        BuildStats {
            scripts: 1,
            markup: 1,
            styles: 1,
            copied: 1,
            renamed: 0,
            warnings: 0,
            staged: 1,
        }
    );
}

#[test]
fn test_unminified_text_unchanged() {
    let dir = TempDir::new().unwrap();
    sample_site(dir.path());
    let config = test_config_for(dir.path(), "[build]\nminify = false");

    build_site(&config).unwrap();

    let out = &config.build.output;
    for rel in ["index.html", "js/app.js", "css/site.css", "img/logo.png"] {
        assert_eq!(read(out, rel), read(dir.path(), rel), "{rel} changed");
    }
}

#[test]
fn test_minified_outputs_shrink() {
    let dir = TempDir::new().unwrap();
    sample_site(dir.path());
    let config = test_config_for(dir.path(), "");

    let stats = build_site(&config).unwrap();

    let out = &config.build.output;
    assert_eq!(stats.warnings, 0);
    assert_eq!(read(out, "css/site.css"), "body{margin:0;}");
    assert!(read(out, "js/app.js").len() < read(dir.path(), "js/app.js").len());
    assert!(read(out, "index.html").len() < read(dir.path(), "index.html").len());
}

#[test]
fn test_css_minify_idempotent_across_builds() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "site.css", "/* x */ a , b { color : red ; }");
    let config = test_config_for(dir.path(), "");
    build_site(&config).unwrap();
    let once = read(&config.build.output, "site.css");

    let second = TempDir::new().unwrap();
    write(second.path(), "site.css", &once);
    let config = test_config_for(second.path(), "");
    build_site(&config).unwrap();

    assert_eq!(read(&config.build.output, "site.css"), once);
}

#[test]
fn test_excluded_paths_absent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "assets/raw/big.psd", "x");
    write(dir.path(), "assets/raw/nested/more.psd", "x");
    write(dir.path(), "assets/keep.png", "x");
    write(dir.path(), "drafts/post.html", "<p>x</p>");
    write(dir.path(), "notes/drafts", "x");
    write(dir.path(), "page.html", "<p>x</p>");
    let config = test_config_for(
        dir.path(),
        "[build]\nminify = false\nexclude = [\"./assets/raw/\", \"drafts\"]",
    );

    build_site(&config).unwrap();

    assert_eq!(files(&config.build.output), ["assets/keep.png", "page.html"]);
}

#[test]
fn test_guard_prefixes_every_script() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.js", "console.log(1)");
    write(dir.path(), "lib/b.js", "var b = 2;");
    write(dir.path(), "broken.js", "function (");
    let config = test_config_for(
        dir.path(),
        "[build.guard]\ndomains = [\"Example.com\"]",
    );

    let stats = build_site(&config).unwrap();

    let guard = TransformContext::new(&config.build)
        .guard()
        .unwrap()
        .to_string();
    assert!(guard.contains("\"example.com\""));
    for rel in ["a.js", "lib/b.js", "broken.js"] {
        let out = read(&config.build.output, rel);
        assert!(out.starts_with(&format!("{guard}\n")), "{rel} not guarded");
    }
    assert_eq!(stats.warnings, 1);
}

#[test]
fn test_no_guard_without_domains() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.js", "console.log(1)");
    let config = test_config_for(dir.path(), "[build]\nminify = false");

    build_site(&config).unwrap();

    assert_eq!(read(&config.build.output, "a.js"), "console.log(1)");
}

#[test]
fn test_obfuscated_script_referenced_from_html() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.js", "console.log(1)");
    write(dir.path(), "index.html", "<script src='a.js'></script>");
    let config = test_config_for(
        dir.path(),
        "[build]\nminify = false\n[build.obfuscate]\nenable = true",
    );

    let stats = build_site(&config).unwrap();

    let out = &config.build.output;
    let src = first_src(&read(out, "index.html"));
    assert!(Regex::new(r"^[0-9a-f]{8}\.js$").unwrap().is_match(&src), "src = {src}");
    assert_eq!(read(out, &src), "console.log(1)");
    assert!(!out.join("a.js").exists());
    assert_eq!(stats.renamed, 1);
}

#[test]
fn test_deferred_rewrite_sees_later_scripts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "about.html", "<script src=\"js/z.js\"></script>");
    write(dir.path(), "js/z.js", "let z = 1;");
    let config = test_config_for(
        dir.path(),
        "[build]\nminify = false\n[build.obfuscate]\nenable = true\nrewrite = \"deferred\"",
    );

    build_site(&config).unwrap();

    let src = first_src(&read(&config.build.output, "about.html"));
    assert_ne!(src, "js/z.js");
    assert!(src.starts_with("js/"));
    assert!(config.build.output.join(&src).exists());
}

#[test]
fn test_ordered_rewrite_only_sees_earlier_scripts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "about.html", "<script src=\"js/z.js\"></script>");
    write(dir.path(), "js/z.js", "let z = 1;");
    write(dir.path(), "zz.html", "<script src=\"js/z.js\"></script>");
    let config = test_config_for(
        dir.path(),
        "[build]\nminify = false\n[build.obfuscate]\nenable = true\nrewrite = \"ordered\"",
    );

    build_site(&config).unwrap();

    let out = &config.build.output;
    assert_eq!(first_src(&read(out, "about.html")), "js/z.js");
    assert_ne!(first_src(&read(out, "zz.html")), "js/z.js");
}

#[test]
fn test_stage_copies_only_json() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data/llm/x.json", "{}");
    write(dir.path(), "data/llm/x.pdf", "%PDF");
    write(dir.path(), "index.html", "<p>hi</p>");
    let config = test_config_for(dir.path(), "");

    let stats = build_site(&config).unwrap();

    let out = &config.build.output;
    assert!(out.join("data/llm/x.json").exists());
    assert!(!out.join("data/llm/x.pdf").exists());
    assert_eq!(stats.staged, 1);
}

#[test]
fn test_builds_without_obfuscation_are_identical() {
    let dir = TempDir::new().unwrap();
    sample_site(dir.path());
    write(dir.path(), "js/more.js", "function f(a, b) { return a + b; }");
    let config = test_config_for(dir.path(), "[build.guard]\ndomains = [\"example.com\"]");

    build_site(&config).unwrap();
    let first = snapshot(&config.build.output);
    build_site(&config).unwrap();
    let second = snapshot(&config.build.output);

    assert_eq!(first, second);
}

#[test]
fn test_content_seed_builds_are_identical() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.js", "console.log(1)");
    write(dir.path(), "index.html", "<script src='a.js'></script>");
    let config = test_config_for(
        dir.path(),
        "[build.obfuscate]\nenable = true\nseed = \"content\"",
    );

    build_site(&config).unwrap();
    let first = snapshot(&config.build.output);
    build_site(&config).unwrap();
    let second = snapshot(&config.build.output);

    assert_eq!(first, second);
}

#[test]
fn test_stale_output_removed() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.html", "<p>hi</p>");
    write(dir.path(), "dist/stale.txt", "old");
    let config = test_config_for(dir.path(), "");

    build_site(&config).unwrap();

    assert_eq!(files(&config.build.output), ["index.html"]);
}

#[test]
fn test_output_outside_source() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "site/index.html", "<p>hi</p>");
    let config = test_config_for(
        dir.path(),
        "[build]\nsource = \"site\"\noutput = \"public\"",
    );

    build_site(&config).unwrap();

    assert!(dir.path().join("public/index.html").exists());
}

#[test]
fn test_missing_source_fails() {
    let dir = TempDir::new().unwrap();
    let config = test_config_for(dir.path(), "[build]\nsource = \"missing\"");
    assert!(build_site(&config).is_err());
}

#[test]
fn test_transform_order() {
    let file = |rel: &str| SourceFile {
        path: Path::new("/src").join(rel),
        rel: rel.into(),
    };
    let files = vec![file("a.html"), file("b.js"), file("c.css"), file("d.htm")];

    let deferred = transform_order(files.clone(), true, RewriteMode::Deferred);
    let rels: Vec<_> = deferred.iter().map(|f| to_slash(&f.rel)).collect();
    assert_eq!(rels, ["b.js", "c.css", "a.html", "d.htm"]);

    assert_eq!(transform_order(files.clone(), true, RewriteMode::Ordered), files);
    assert_eq!(transform_order(files.clone(), false, RewriteMode::Deferred), files);
}
