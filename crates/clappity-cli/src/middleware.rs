// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Middleware run before route dispatch.
//!
//! Each middleware receives the request mutably and either lets dispatch
//! continue or answers the request itself. They run in registration
//! order; the first [`Flow::Respond`] ends the chain.

use std::sync::Arc;

use clappity::{ClappityRequest, ClappityResponse};

/// What happens after a middleware ran.
#[derive(Debug)]
pub enum Flow {
    /// Run the next middleware, then the route handler.
    Continue,
    /// Skip everything else and send this response.
    Respond(ClappityResponse),
}

/// A shared middleware function.
pub type Middleware = Arc<dyn Fn(&mut ClappityRequest) -> Flow + Send + Sync>;

/// Logs every request at info level.
pub fn request_logger() -> impl Fn(&mut ClappityRequest) -> Flow + Send + Sync + 'static {
    |request: &mut ClappityRequest| {
        tracing::info!("Incoming request: [{}] {}", request.method, request.path);
        Flow::Continue
    }
}

/// Runs a middleware chain.
///
/// Returns the response of the first middleware that answers, or `None`
/// when every middleware let the request through.
pub fn run_chain(chain: &[Middleware], request: &mut ClappityRequest) -> Option<ClappityResponse> {
    for middleware in chain {
        if let Flow::Respond(response) = middleware(request) {
            return Some(response);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_continues() {
        let logger = request_logger();
        let mut request = ClappityRequest::new("GET", "/");
        assert!(matches!(logger(&mut request), Flow::Continue));
    }

    #[test]
    fn test_chain_stops_at_first_response() {
        let chain: Vec<Middleware> = vec![
            Arc::new(|req: &mut ClappityRequest| {
                req.headers.insert("x-seen".into(), "1".into());
                Flow::Continue
            }),
            Arc::new(|req: &mut ClappityRequest| {
                if req.header("authorization").is_none() {
                    Flow::Respond(ClappityResponse::html(401, "<h1>401</h1>"))
                } else {
                    Flow::Continue
                }
            }),
            Arc::new(|_: &mut ClappityRequest| -> Flow { panic!("never reached") }),
        ];

        let mut request = ClappityRequest::new("GET", "/");
        let response = run_chain(&chain, &mut request).unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(request.header("x-seen"), Some("1"));
    }

    #[test]
    fn test_empty_chain_passes() {
        let mut request = ClappityRequest::new("GET", "/");
        assert!(run_chain(&[], &mut request).is_none());
    }
}
