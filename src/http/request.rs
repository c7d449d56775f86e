use std::collections::HashMap;

use crate::http::HTTP_VERSION;

/// HTTP request methods.
///
/// GET is the only verb this server speaks; anything else on the wire is
/// rejected during parsing, before a `Request` ever exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

/// Represents a parsed HTTP request from a client.
///
/// A `Request` only ever exists fully formed: the parser hands one out after
/// the whole head has been read and validated, never earlier. `Host` and
/// `Connection: close` are pulled out of the header block into their own
/// fields; everything else stays in `headers`.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (always GET)
    pub method: Method,
    /// The request target from the start line (e.g. "/index.html")
    pub target: String,
    /// HTTP version (always "HTTP/1.1")
    pub version: String,
    /// Remaining request headers, keyed by canonical name
    pub headers: HashMap<String, String>,
    /// Value of the required Host header
    pub host: String,
    /// Whether the client sent "Connection: close"
    pub close: bool,
}

/// Builder for constructing Request objects.
///
/// Method and version are pinned to the only values the parser accepts, so
/// a built request is as well-formed as a parsed one.
pub struct RequestBuilder {
    target: String,
    headers: HashMap<String, String>,
    host: String,
    close: bool,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }
}

/// Canonicalizes a header name: each dash-separated word gets an uppercase
/// first letter and lowercase rest, so "content-TYPE" becomes "Content-Type".
///
/// The parser stores header names in this form; lookups canonicalize the
/// queried name the same way, which makes header access case-insensitive.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            target: "/".to_string(),
            headers: HashMap::new(),
            host: String::new(),
            close: false,
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(canonical_header_name(&name.into()), value.into());
        self
    }

    pub fn close(mut self) -> Self {
        self.close = true;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: Method::GET,
            target: self.target,
            version: HTTP_VERSION.to_string(),
            headers: self.headers,
            host: self.host,
            close: self.close,
        }
    }
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    ///
    /// # Arguments
    ///
    /// * `name` - Header name to look up, any casing
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the header value if present, `None` otherwise.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_name(name))
            .map(|v| v.as_str())
    }
}
