use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::http::HTTP_VERSION;
use crate::http::request::Request;

/// HTTP status codes this server can send.
///
/// Every response is one of:
/// - `Ok` (200): File found and served
/// - `BadRequest` (400): Malformed or timed-out request
/// - `NotFound` (404): No file behind the requested path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// The body, when there is one, is a file on disk that the writer streams
/// out; `Response` itself never buffers file contents. Only 200 responses
/// carry a file path, and the path must name an existing regular file whose
/// size went into Content-Length.
#[derive(Debug)]
pub struct Response {
    /// Protocol version written into the status line
    pub proto: &'static str,
    /// The HTTP status code
    pub status: StatusCode,
    /// Response headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// The valid request this response answers; absent for a 400 produced
    /// without one
    pub request: Option<Request>,
    /// Local path of the file to stream as the body; absent means empty body
    pub file_path: Option<PathBuf>,
}

impl Response {
    /// Creates a response with the given status and a fresh Date header.
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "Date".to_string(),
            httpdate::fmt_http_date(SystemTime::now()),
        );

        Self {
            proto: HTTP_VERSION,
            status,
            headers,
            request: None,
            file_path: None,
        }
    }

    /// Adds or replaces a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the file whose bytes become the response body.
    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    /// Attaches the request that produced this response. A request that
    /// asked for "Connection: close" gets the header echoed back here.
    pub fn with_request(mut self, request: Request) -> Self {
        if request.close {
            self = self.with_header("Connection", "close");
        }
        self.request = Some(request);
        self
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Response::new(StatusCode::NotFound)
    }

    /// Creates a 400 Bad Request response. A 400 always ends the
    /// connection, so it always carries "Connection: close".
    pub fn bad_request() -> Self {
        Response::new(StatusCode::BadRequest).with_header("Connection", "close")
    }

    /// Whether the connection must close once this response is written:
    /// either the response is a 400, or the request demanded it.
    pub fn must_close(&self) -> bool {
        self.status == StatusCode::BadRequest
            || self.request.as_ref().map(|req| req.close).unwrap_or(false)
    }
}
