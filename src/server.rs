//! Local HTTP server for browsing the dashboard.
//!
//! Requests are handled one at a time on the calling thread. Each request
//! reads the cached table, rebuilds the requested view and renders it, so
//! navigating in the browser is a full recompute every time.

use anyhow::{anyhow, Result};
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::data::DataSource;
use crate::report::{self, PageAssets};
use crate::view::{build_dashboard, Navigation, ViewSettings, ViewType};

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// A rendered response, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, TEXT, body)
    }
}

/// Routes requests onto the view controller.
pub struct DashboardServer<'a> {
    source: &'a DataSource,
    settings: ViewSettings,
    assets: PageAssets,
}

impl<'a> DashboardServer<'a> {
    pub fn new(source: &'a DataSource, config: &Config) -> Self {
        Self {
            source,
            settings: config.view_settings(),
            assets: config.page_assets(),
        }
    }

    /// Produce the reply for a request line.
    pub fn route(&self, method: &Method, url: &str) -> Reply {
        if *method != Method::Get {
            return Reply::text(405, "method not allowed");
        }

        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };

        match path {
            "/healthz" => Reply::text(200, "ok"),
            "/" | "/index.html" => self.dashboard(query, false),
            "/api/dashboard" => self.dashboard(query, true),
            _ => Reply::text(404, "not found"),
        }
    }

    fn dashboard(&self, query: Option<&str>, as_json: bool) -> Reply {
        let nav = match parse_navigation(query) {
            Ok(nav) => nav,
            Err(e) => return Reply::text(400, e),
        };
        debug!("Navigation: {:?}", nav);

        let table = match self.source.table() {
            Ok(table) => table,
            Err(e) => {
                error!("{}", e);
                let message = e.user_message();
                return if as_json {
                    match report::generate_json_error(&message) {
                        Ok(body) => Reply::new(503, JSON, body),
                        Err(_) => Reply::text(503, message),
                    }
                } else {
                    Reply::new(
                        503,
                        HTML,
                        report::generate_error_page(&self.settings.title, &message, &self.assets),
                    )
                };
            }
        };

        let dashboard = build_dashboard(table, nav, &self.settings);

        if as_json {
            match report::generate_json_report(&dashboard) {
                Ok(body) => Reply::new(200, JSON, body),
                Err(e) => Reply::text(500, e.to_string()),
            }
        } else {
            Reply::new(200, HTML, report::generate_html_page(&dashboard, &self.assets))
        }
    }

    fn handle(&self, request: Request) {
        let reply = self.route(request.method(), request.url());
        debug!("{:?} {} -> {}", request.method(), request.url(), reply.status);

        let response = Response::from_string(reply.body).with_status_code(reply.status);
        let response = match Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
        {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        };

        if let Err(e) = request.respond(response) {
            warn!("Failed to send response: {}", e);
        }
    }
}

/// Parse `view` and `goal` from a query string.
///
/// Missing parameters fall back to the overview; unknown parameters are
/// ignored. An empty `goal` means "no selection".
pub fn parse_navigation(query: Option<&str>) -> Result<Navigation, String> {
    let mut nav = Navigation::default();

    let Some(query) = query else {
        return Ok(nav);
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(&value.replace('+', " "))
            .map_err(|e| format!("invalid query encoding: {}", e))?
            .into_owned();

        match key {
            "view" => nav.view = value.parse::<ViewType>()?,
            "goal" if value.trim().is_empty() => nav.goal = None,
            "goal" => {
                let goal = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| format!("invalid goal '{}'", value))?;
                nav.goal = Some(goal);
            }
            _ => {}
        }
    }

    Ok(nav)
}

/// Serve the dashboard until the process is stopped.
pub fn serve(config: &Config, source: &DataSource) -> Result<()> {
    let bind = config.server.bind.as_str();
    let server =
        Server::http(bind).map_err(|e| anyhow!("Failed to bind server to {}: {}", bind, e))?;

    let url = format!("http://{}/", bind);
    info!("Serving dashboard at {}", url);
    println!("🌐 Dashboard available at {}", url);

    if config.server.open_browser {
        if let Err(e) = open::that(&url) {
            warn!("Failed to open browser: {}", e);
            eprintln!("Open {} manually.", url);
        }
    }

    let dashboard = DashboardServer::new(source, config);
    for request in server.incoming_requests() {
        dashboard.handle(request);
    }

    Ok(())
}
