// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request dispatch.

use std::path::Path;
use std::sync::Arc;

use clappity::{ClappityRequest, ClappityResponse, DataContext, FileSystemResolver};

use super::AppContext;
use crate::config::Config;
use crate::middleware::{request_logger, run_chain, Flow, Middleware};
use crate::router::{Lookup, RouteTable, RoutingResult};

/// A route table, a middleware chain and the context handlers see.
///
/// # Example
///
/// ```rust
/// use clappity::{ClappityRequest, ClappityResponse, MemoryResourceResolver};
/// use clappity_cli::server::{App, AppContext};
///
/// let mut app = App::new(AppContext::new(MemoryResourceResolver::new()));
/// app.get("/", |_, _| ClappityResponse::html(200, "<h1>Home</h1>"))?;
///
/// let response = app.dispatch(ClappityRequest::new("GET", "/"));
/// assert_eq!(response.body, "<h1>Home</h1>");
/// # Ok::<(), clappity_cli::router::RoutingError>(())
/// ```
pub struct App {
    context: AppContext,
    routes: RouteTable,
    middleware: Vec<Middleware>,
}

impl App {
    /// Creates an app with no routes and no middleware.
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            routes: RouteTable::new(),
            middleware: Vec::new(),
        }
    }

    /// Builds the app described by a project configuration.
    ///
    /// Templates are read from `server.templates_dir` under `root`, the
    /// request logger is installed and every `[[routes]]` entry becomes a
    /// page.
    pub fn from_config(config: &Config, root: &Path) -> anyhow::Result<Self> {
        let templates_dir = root.join(&config.server.templates_dir);
        let context = AppContext::with_options(
            FileSystemResolver::new(&templates_dir),
            config.render.to_options(),
        );

        let mut app = App::new(context);
        app.use_middleware(request_logger());

        for route in &config.routes {
            let data = route.data_context().map_err(|e| {
                anyhow::anyhow!("Invalid data for route [{}] {}: {}", route.method, route.path, e)
            })?;
            app.page(&route.method, &route.path, &route.template, data)?;
        }

        Ok(app)
    }

    /// The context passed to handlers.
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// The registered routes.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Appends a middleware to the chain.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut ClappityRequest) -> Flow + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Registers a handler for a method and path pattern.
    pub fn route<F>(&mut self, method: &str, path: &str, handler: F) -> RoutingResult<&mut Self>
    where
        F: Fn(&AppContext, &ClappityRequest) -> ClappityResponse + Send + Sync + 'static,
    {
        self.routes.route(method, path, handler)?;
        Ok(self)
    }

    /// Registers a `GET` handler.
    pub fn get<F>(&mut self, path: &str, handler: F) -> RoutingResult<&mut Self>
    where
        F: Fn(&AppContext, &ClappityRequest) -> ClappityResponse + Send + Sync + 'static,
    {
        self.route("GET", path, handler)
    }

    /// Registers a `POST` handler.
    pub fn post<F>(&mut self, path: &str, handler: F) -> RoutingResult<&mut Self>
    where
        F: Fn(&AppContext, &ClappityRequest) -> ClappityResponse + Send + Sync + 'static,
    {
        self.route("POST", path, handler)
    }

    /// Registers a page that renders `template`.
    ///
    /// The template sees `data` first, then route parameters, query
    /// values and body fields for keys `data` does not define.
    pub fn page(
        &mut self,
        method: &str,
        path: &str,
        template: &str,
        data: DataContext,
    ) -> RoutingResult<&mut Self> {
        self.route(method, path, page_handler(template.to_string(), data))
    }

    /// Runs the middleware chain and the matching handler.
    ///
    /// An unknown path answers 404. A known path without a handler for
    /// the method answers 405, except that `HEAD` falls back to `GET`.
    pub fn dispatch(&self, mut request: ClappityRequest) -> ClappityResponse {
        if let Some(response) = run_chain(&self.middleware, &mut request) {
            return response;
        }

        let mut lookup = self.routes.lookup(&request.method, &request.path);
        if request.method == "HEAD" && matches!(lookup, Lookup::MethodNotAllowed) {
            lookup = self.routes.lookup("GET", &request.path);
        }

        match lookup {
            Lookup::Found { handler, params } => {
                request.params.extend(params);
                handler(&self.context, &request)
            }
            Lookup::MethodNotAllowed => {
                tracing::warn!("405 Method Not Allowed: [{}] {}", request.method, request.path);
                ClappityResponse::method_not_allowed()
            }
            Lookup::NotFound => {
                tracing::warn!("404 Not Found: [{}] {}", request.method, request.path);
                ClappityResponse::not_found()
            }
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.routes)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

fn page_handler(
    template: String,
    data: DataContext,
) -> impl Fn(&AppContext, &ClappityRequest) -> ClappityResponse + Send + Sync + 'static {
    move |app: &AppContext, request: &ClappityRequest| {
        let mut ctx = data.clone();
        if let Err(e) = request.fill_context(&mut ctx) {
            return ClappityResponse::error_page(400, &e.to_string());
        }
        app.render(&template, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clappity::MemoryResourceResolver;
    use std::collections::HashMap;

    fn app() -> App {
        let resolver = MemoryResourceResolver::new();
        resolver.add_template("user.clp", "<p>[[id]] [[tab]] [[title]]</p>");
        App::new(AppContext::new(resolver))
    }

    #[test]
    fn test_dispatch_statuses() {
        let mut app = app();
        app.get("/", |_, _| ClappityResponse::html(200, "home")).unwrap();

        let ok = app.dispatch(ClappityRequest::new("GET", "/"));
        assert_eq!((ok.status, ok.body.as_str()), (200, "home"));

        let missing = app.dispatch(ClappityRequest::new("GET", "/nope"));
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body, "<h1>404 Not Found</h1>");

        let wrong_method = app.dispatch(ClappityRequest::new("DELETE", "/"));
        assert_eq!(wrong_method.status, 405);
        assert_eq!(wrong_method.body, "<h1>405 Method Not Allowed</h1>");

        let head = app.dispatch(ClappityRequest::new("HEAD", "/"));
        assert_eq!(head.status, 200);
    }

    #[test]
    fn test_middleware_order_and_short_circuit() {
        let mut app = app();
        app.get("/", |_, req| {
            ClappityResponse::html(200, req.header("x-trace").unwrap_or("").to_string())
        })
        .unwrap();
        app.use_middleware(|req: &mut ClappityRequest| {
            req.headers.insert("x-trace".into(), "a".into());
            Flow::Continue
        })
        .use_middleware(|req: &mut ClappityRequest| {
            let trace = format!("{}b", req.header("x-trace").unwrap_or(""));
            req.headers.insert("x-trace".into(), trace);
            Flow::Continue
        });

        assert_eq!(app.dispatch(ClappityRequest::new("GET", "/")).body, "ab");

        app.use_middleware(|req: &mut ClappityRequest| {
            if req.path == "/" {
                Flow::Respond(ClappityResponse::redirect("/login"))
            } else {
                Flow::Continue
            }
        });
        let response = app.dispatch(ClappityRequest::new("GET", "/"));
        assert_eq!(response.status, 302);
    }

    #[test]
    fn test_post_body_reaches_handler() {
        let mut app = app();
        app.post("/echo", |_, req| {
            ClappityResponse::text(200, req.body_str().unwrap_or_default().to_string())
        })
        .unwrap();

        let request = ClappityRequest::new("POST", "/echo").with_body(b"payload".to_vec());
        assert_eq!(app.dispatch(request).body, "payload");
    }

    #[test]
    fn test_page_merges_request_values() {
        let mut app = app();
        let data = DataContext::new().with("title", "Profile").with("tab", "info");
        app.page("GET", "/users/{id}", "user.clp", data).unwrap();

        let request = ClappityRequest::new("GET", "/users/7?tab=posts&title=Hacked");
        let response = app.dispatch(request);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<p>7 info Profile</p>");
    }

    #[test]
    fn test_page_reads_form_fields() {
        let resolver = MemoryResourceResolver::new();
        resolver.add_template("hello.clp", "Hello [[name]]");
        let mut app = App::new(AppContext::new(resolver));
        app.page("POST", "/hello", "hello.clp", DataContext::new()).unwrap();

        let request = ClappityRequest::new("POST", "/hello")
            .with_headers(HashMap::from([(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )]))
            .with_body(b"name=Ann".to_vec());
        assert_eq!(app.dispatch(request).body, "Hello Ann");
    }

    #[test]
    fn test_page_with_missing_template() {
        let mut app = app();
        app.page("GET", "/gone", "gone.clp", DataContext::new()).unwrap();
        let response = app.dispatch(ClappityRequest::new("GET", "/gone"));
        assert_eq!(response.status, 500);
        assert!(response.body.contains("gone.clp"));
    }

    #[test]
    fn test_from_config_registers_routes() {
        let config = Config::parse(
            r#"
[[routes]]
path = "/"
template = "index.clp"

[routes.data]
title = "Home"

[[routes]]
method = "POST"
path = "/submit"
template = "index.clp"
"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let app = App::from_config(&config, dir.path()).unwrap();
        assert_eq!(app.routes().len(), 2);
    }

    #[test]
    fn test_from_config_rejects_nested_data() {
        let config = Config::parse(
            r#"
[[routes]]
path = "/"
template = "index.clp"

[routes.data.nested]
key = "value"
"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = App::from_config(&config, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid data for route [GET] /"));
    }
}
