// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for the HTTP server.
//!
//! These tests drive the axum router built from an `App` through
//! `axum-test`, without binding a socket.

use std::fs;
use std::path::Path;

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use clappity::{ClappityRequest, ClappityResponse, DataContext, MemoryResourceResolver};
use clappity_cli::commands::init::scaffold;
use clappity_cli::config::{Config, CONFIG_FILE};
use clappity_cli::middleware::Flow;
use clappity_cli::server::{App, AppContext, MAX_BODY_SIZE};
use tempfile::tempdir;

/// Builds a server for the demo project scaffolded into `dir`.
fn demo_server(dir: &Path) -> TestServer {
    scaffold(dir, "demo").unwrap();
    let config = Config::load_from(&dir.join(CONFIG_FILE)).unwrap();
    let app = App::from_config(&config, dir).unwrap();
    let static_dir = dir.join(&config.server.static_dir);
    TestServer::new(app.into_router(Some(&static_dir))).unwrap()
}

fn api_server() -> TestServer {
    let resolver = MemoryResourceResolver::new();
    resolver.add_template("user.clp", "<p>User [[id]]</p>");

    let mut app = App::new(AppContext::new(resolver));
    app.post("/echo", |_, req| {
        let form = req.form().unwrap_or_default();
        let name = form.get("name").cloned().unwrap_or_default();
        ClappityResponse::text(200, format!("Hello {}", name))
    })
    .unwrap();
    app.get("/users/{id}", |app, req| {
        app.render("user.clp", &DataContext::new().with("id", req.param("id").unwrap_or("?")))
    })
    .unwrap();
    app.get("/admin", |_, _| ClappityResponse::html(200, "secret")).unwrap();
    app.use_middleware(|req: &mut ClappityRequest| {
        if req.path.starts_with("/admin") && req.header("authorization").is_none() {
            Flow::Respond(ClappityResponse::html(401, "<h1>401 Unauthorized</h1>"))
        } else {
            Flow::Continue
        }
    });

    TestServer::new(app.into_router(None)).unwrap()
}

#[tokio::test]
async fn test_demo_home_page() {
    let dir = tempdir().unwrap();
    let server = demo_server(dir.path());

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("content-type"),
        "text/html; charset=utf-8"
    );

    let html = response.text();
    assert!(html.contains("<title>Home Page</title>"));
    assert!(html.contains("<p>Please log in.</p>"));
    assert!(!html.contains("Welcome back"));
    assert!(html.contains("<li>Item 1</li>\n<li>Item 2</li>\n<li>Item 3</li>"));
    assert!(!html.contains("[["));
}

#[tokio::test]
async fn test_query_does_not_override_configured_data() {
    let dir = tempdir().unwrap();
    let server = demo_server(dir.path());

    let html = server.get("/?title=Hacked&isUserLoggedIn=true").await.text();
    assert!(html.contains("<title>Home Page</title>"));
    assert!(html.contains("<p>Please log in.</p>"));
}

#[tokio::test]
async fn test_unknown_path_and_method() {
    let dir = tempdir().unwrap();
    let server = demo_server(dir.path());

    let missing = server.get("/missing").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(missing.text(), "<h1>404 Not Found</h1>");

    let wrong = server.method(Method::DELETE, "/").await;
    assert_eq!(wrong.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(wrong.text(), "<h1>405 Method Not Allowed</h1>");
}

#[tokio::test]
async fn test_static_files() {
    let dir = tempdir().unwrap();
    let server = demo_server(dir.path());

    let css = server.get("/static/style.css").await;
    assert_eq!(css.status_code(), StatusCode::OK);
    assert!(css.text().contains("font-family"));
}

#[tokio::test]
async fn test_broken_template_gives_error_page() {
    let dir = tempdir().unwrap();
    let server = {
        scaffold(dir.path(), "demo").unwrap();
        fs::write(
            dir.path().join("templates/index.clp"),
            "<p>[[for item itemList]] { <b>[[item]]</b> }</p>",
        )
        .unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        let app = App::from_config(&config, dir.path()).unwrap();
        TestServer::new(app.into_router(None)).unwrap()
    };

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("Template syntax error"));
}

#[tokio::test]
async fn test_post_form_reaches_handler() {
    let server = api_server();

    let response = server.post("/echo").form(&[("name", "Ann")]).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "Hello Ann");
}

#[tokio::test]
async fn test_body_too_large() {
    let server = api_server();

    let response = server
        .post("/echo")
        .bytes(vec![b'a'; MAX_BODY_SIZE + 1].into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Body too large");
}

#[tokio::test]
async fn test_route_params() {
    let server = api_server();

    let response = server.get("/users/42").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "<p>User 42</p>");
}

#[tokio::test]
async fn test_middleware_short_circuit() {
    let server = api_server();

    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "<h1>401 Unauthorized</h1>");
}
