// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for loading and rendering templates from disk.

use std::fs;

use clappity::{ClappityError, DataContext, Engine, FileSystemResolver};
use tempfile::tempdir;

const INDEX: &str = "<h1>[[title]]</h1>
[[section nav]] {
<ul>
[[for link in links]] {
<li>[[link]]</li>
}
</ul>
}
[[if !isUserLoggedIn]] { <a href=\"/login\">Log in</a> }
";

fn engine(dir: &std::path::Path) -> Engine<FileSystemResolver> {
    fs::create_dir_all(dir.join("pages")).unwrap();
    fs::write(dir.join("index.clp"), INDEX).unwrap();
    fs::write(dir.join("pages/about.clp"), "About [[title]]").unwrap();
    Engine::new(FileSystemResolver::new(dir))
}

#[test]
fn test_render_file_from_disk() {
    let dir = tempdir().unwrap();
    let engine = engine(dir.path());

    let ctx = DataContext::new()
        .with("title", "Home")
        .with("links", vec!["a", "b"]);
    let rendered = engine.render_file_document("index.clp", &ctx).unwrap();

    assert!(rendered
        .output
        .starts_with("<h1>Home</h1>\n<ul>\n<li>a</li>\n<li>b</li>\n"));
    assert!(rendered.output.contains("</ul>"));
    assert!(rendered.output.contains("<a href=\"/login\">Log in</a>"));
    let nav = rendered.section("nav").unwrap();
    assert!(nav.content.contains("<li>b</li>"));
}

#[test]
fn test_extension_is_optional() {
    let dir = tempdir().unwrap();
    let engine = engine(dir.path());
    let ctx = DataContext::new().with("title", "Us");

    assert_eq!(engine.render_file("pages/about", &ctx).unwrap(), "About Us");
    assert_eq!(engine.render_file("/pages/about.clp", &ctx).unwrap(), "About Us");
}

#[test]
fn test_names_cannot_leave_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("site");
    fs::write(dir.path().join("secret.clp"), "secret").unwrap();
    let engine = engine(&root);

    let err = engine
        .render_file("../secret.clp", &DataContext::new())
        .unwrap_err();
    assert!(matches!(err, ClappityError::Resolution(_)));
}

#[test]
fn test_serve_file_placeholder() {
    let dir = tempdir().unwrap();
    let engine = engine(dir.path());

    assert_eq!(
        engine.serve_file("missing.clp", &DataContext::new()),
        "Error: Could not load file missing.clp"
    );
}

#[test]
fn test_check_file() {
    let dir = tempdir().unwrap();
    let engine = engine(dir.path());

    assert_eq!(engine.check_file("index.clp").unwrap(), 5);

    fs::write(dir.path().join("bad.clp"), "ok\n[[if flag]] { never closed").unwrap();
    let err = engine.check_file("bad.clp").unwrap_err();
    assert!(matches!(err, ClappityError::UnexpectedEndOfInput { .. }));
    assert_eq!(err.offset(), Some(15));
}
