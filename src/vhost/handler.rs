//! Request handling for static files.

use std::sync::Arc;

use tracing::info;

use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::vhost::resolver::VirtualHostResolver;

/// Turns parsed requests into responses backed by files on disk.
pub struct StaticHandler {
    resolver: Arc<VirtualHostResolver>,
}

impl StaticHandler {
    pub fn new(resolver: Arc<VirtualHostResolver>) -> Self {
        Self { resolver }
    }

    /// Handle a well-formed request, producing a 200 with the file's
    /// metadata headers or a 404 with no body.
    pub async fn handle(&self, request: Request) -> Response {
        let response = match self.resolver.resolve(&request.host, &request.target).await {
            Some(file) => Response::new(StatusCode::Ok)
                .with_header("Last-Modified", httpdate::fmt_http_date(file.modified))
                .with_header("Content-Type", mime::content_type(&file.path))
                .with_header("Content-Length", file.len.to_string())
                .with_file(file.path),
            None => Response::not_found(),
        };

        info!(
            host = %request.host,
            target = %request.target,
            status = response.status.as_u16(),
            "request handled"
        );

        response.with_request(request)
    }
}
