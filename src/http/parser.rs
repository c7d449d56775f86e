use std::collections::HashMap;
use std::fmt;

use crate::http::HTTP_VERSION;
use crate::http::request::{Method, Request, canonical_header_name};

/// Classified reasons a byte stream can fail to ever form a valid request.
///
/// Each variant carries the offending text where one exists, decoded lossily
/// when the bytes were not UTF-8, for diagnostics only; the wire answer is
/// always a single 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The start line did not split into exactly three fields, or was not
    /// valid UTF-8
    MalformedStartLine(String),
    /// Method, target, or protocol version outside what this server accepts
    InvalidMethodOrVersion(String),
    /// A header line without a colon, not valid UTF-8, or cut off before
    /// its CRLF
    InvalidHeaderSyntax(String),
    /// The header block ended without any Host header
    MissingHostHeader,
    /// The request head outgrew the connection's buffer limit
    RequestHeadTooLarge,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedStartLine(line) => write!(f, "malformed start line {line:?}"),
            ParseError::InvalidMethodOrVersion(line) => {
                write!(f, "invalid method or version {line:?}")
            }
            ParseError::InvalidHeaderSyntax(line) => write!(f, "invalid header {line:?}"),
            ParseError::MissingHostHeader => write!(f, "missing Host header"),
            ParseError::RequestHeadTooLarge => write!(f, "request head too large"),
        }
    }
}

/// Outcome of one parse attempt over a connection's buffered bytes.
#[derive(Debug)]
pub enum ParseOutcome {
    /// A complete request, plus how many buffer bytes it consumed
    Success(Request, usize),
    /// The buffer holds a valid prefix of a request; more bytes are needed
    NeedMoreInput,
    /// No valid request can come out of this stream
    Malformed(ParseError),
    /// The stream ended cleanly before any byte of a new request
    StreamEnded,
}

/// Parses one request from the front of `buf`.
///
/// The function is pure over the buffer: the connection re-invokes it as
/// bytes accumulate, treating `NeedMoreInput` as a cue to read again. Once
/// the stream is known to carry no further bytes the caller sets `at_eof`,
/// which turns a dangling partial request into a `Malformed` classification
/// (a line without its CRLF is not a valid line) and an empty buffer into
/// `StreamEnded`.
///
/// Consumed bytes are reported rather than drained so pipelined requests
/// behind the first stay untouched in the buffer.
pub fn parse_request(buf: &[u8], at_eof: bool) -> ParseOutcome {
    let mut pos = 0;

    // Start line
    let Some(line) = next_line(buf, &mut pos) else {
        return match (at_eof, buf.is_empty()) {
            (true, true) => ParseOutcome::StreamEnded,
            (true, false) => ParseOutcome::Malformed(ParseError::MalformedStartLine(lossy(buf))),
            (false, _) => ParseOutcome::NeedMoreInput,
        };
    };
    let Ok(line) = std::str::from_utf8(line) else {
        return ParseOutcome::Malformed(ParseError::MalformedStartLine(lossy(line)));
    };

    let mut fields = line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return ParseOutcome::Malformed(ParseError::MalformedStartLine(line.to_string()));
    };

    let Some(method) = Method::from_str(method) else {
        return ParseOutcome::Malformed(ParseError::InvalidMethodOrVersion(line.to_string()));
    };
    if !target.starts_with('/') || version != HTTP_VERSION {
        return ParseOutcome::Malformed(ParseError::InvalidMethodOrVersion(line.to_string()));
    }

    // Header block, up to the empty line
    let mut headers = HashMap::new();
    let mut host = None;
    let mut close = false;

    loop {
        let Some(header_line) = next_line(buf, &mut pos) else {
            return if at_eof {
                ParseOutcome::Malformed(ParseError::InvalidHeaderSyntax(lossy(&buf[pos..])))
            } else {
                ParseOutcome::NeedMoreInput
            };
        };
        if header_line.is_empty() {
            break;
        }
        let Ok(header_line) = std::str::from_utf8(header_line) else {
            return ParseOutcome::Malformed(ParseError::InvalidHeaderSyntax(lossy(header_line)));
        };

        let Some((name, value)) = header_line.split_once(':') else {
            return ParseOutcome::Malformed(ParseError::InvalidHeaderSyntax(
                header_line.to_string(),
            ));
        };
        let name = canonical_header_name(name.trim());
        let value = value.trim().to_string();

        if name == "Host" {
            host = Some(value);
        } else if name == "Connection" && value == "close" {
            close = true;
        } else {
            // Repeated names keep the last occurrence
            headers.insert(name, value);
        }
    }

    let Some(host) = host else {
        return ParseOutcome::Malformed(ParseError::MissingHostHeader);
    };

    let request = Request {
        method,
        target: target.to_string(),
        version: version.to_string(),
        headers,
        host,
        close,
    };
    ParseOutcome::Success(request, pos)
}

/// Returns the next CRLF-terminated line starting at `*pos`, terminator
/// stripped, and advances `*pos` past it. `None` when no full line is
/// buffered yet; a bare LF or CR is ordinary line content.
fn next_line<'a>(buf: &'a [u8], pos: &mut usize) -> Option<&'a [u8]> {
    let rest = &buf[*pos..];
    let end = rest.windows(2).position(|window| window == b"\r\n")?;
    *pos += end + 2;
    Some(&rest[..end])
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
