// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server using Axum.
//!
//! This is a thin adapter that converts HTTP requests to `ClappityRequest`,
//! calls [`App::dispatch`], and converts `ClappityResponse` back to HTTP.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use clappity::{ClappityRequest, ClappityResponse};
use tower_http::services::ServeDir;

use super::App;

/// Largest request body the server buffers.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Builds the axum router for an app.
///
/// Files under `static_dir` are served at `/static`; every other request
/// goes through [`App::dispatch`].
pub fn build_router(app: App, static_dir: Option<&Path>) -> Router {
    let state = Arc::new(app);

    let mut router: Router<Arc<App>> = Router::new();
    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router.fallback(fallback_handler).with_state(state)
}

impl App {
    /// Converts the app into an axum router.
    pub fn into_router(self, static_dir: Option<&Path>) -> Router {
        build_router(self, static_dir)
    }

    /// Binds `addr` and serves until the process stops.
    pub async fn listen(self, addr: &str, static_dir: Option<&Path>) -> anyhow::Result<()> {
        let router = self.into_router(static_dir);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);
        axum::serve(listener, router).await?;
        Ok(())
    }
}

async fn fallback_handler(State(app): State<Arc<App>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let method = parts.method.clone();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let body_bytes = if method != Method::GET && method != Method::HEAD {
        match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
            Ok(bytes) if bytes.is_empty() => None,
            Ok(bytes) => Some(bytes.to_vec()),
            Err(_) => return (StatusCode::BAD_REQUEST, "Body too large").into_response(),
        }
    } else {
        None
    };

    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect();

    let mut request = ClappityRequest::new(method.as_str(), target).with_headers(headers);
    if let Some(bytes) = body_bytes {
        request = request.with_body(bytes);
    }

    // Handlers read templates from disk.
    let response = match tokio::task::spawn_blocking(move || app.dispatch(request)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Request handler failed: {}", e);
            ClappityResponse::error_page(500, "Internal Server Error")
        }
    };

    to_http_response(response)
}

/// Convert ClappityResponse to axum Response
fn to_http_response(response: ClappityResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = axum::http::Response::builder().status(status);

    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    builder.body(Body::from(response.body)).unwrap_or_else(|e| {
        tracing::error!("Invalid response: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response()
    })
}
