use std::mem;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::http::parser::{ParseError, ParseOutcome, parse_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::vhost::StaticHandler;

/// Upper bound on the bytes a single request head may occupy before it is
/// rejected as malformed.
const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Initial read buffer capacity; grows on demand.
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Where a connection currently stands in its request/response cycle.
#[derive(Debug)]
enum ConnectionState {
    /// Accumulating bytes until a full request head is buffered
    Reading,
    /// A request was parsed and awaits a response
    Processing(Request),
    /// A response is being written; the flag says whether the connection
    /// closes once it is out
    Writing(ResponseWriter, bool),
    /// Finished; the connection task returns
    Closed,
}

/// Everything a single read attempt can end in.
///
/// `Malformed` and `TimedOutMidRequest` both earn the client a 400;
/// `PeerClosed` and `TimedOutIdle` end the connection without a response.
#[derive(Debug)]
enum RequestOutcome {
    /// A complete request was parsed off the buffer
    Parsed(Request),
    /// The bytes received can never become a valid request
    Malformed(ParseError),
    /// The peer ended the stream cleanly between requests
    PeerClosed,
    /// The read deadline passed with no request bytes received
    TimedOutIdle,
    /// The read deadline passed with a partial request buffered
    TimedOutMidRequest,
}

/// One accepted client connection, serving requests in sequence until the
/// peer leaves, times out, or sends something unrecoverable.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    handler: Arc<StaticHandler>,
    read_timeout: Duration,
    state: ConnectionState,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        handler: Arc<StaticHandler>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            handler,
            read_timeout,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection through its state machine until it closes.
    ///
    /// Errors returned here are transport failures (a write that could not
    /// complete, an I/O fault); protocol-level problems are answered with a
    /// 400 and are not errors.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            let state = mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await? {
                    RequestOutcome::Parsed(request) => ConnectionState::Processing(request),
                    RequestOutcome::Malformed(error) => {
                        warn!(peer = %self.peer, error = %error, "malformed request");
                        let writer = ResponseWriter::new(&Response::bad_request());
                        ConnectionState::Writing(writer, true)
                    }
                    RequestOutcome::TimedOutMidRequest => {
                        warn!(peer = %self.peer, "read timed out mid-request");
                        let writer = ResponseWriter::new(&Response::bad_request());
                        ConnectionState::Writing(writer, true)
                    }
                    RequestOutcome::PeerClosed => {
                        debug!(peer = %self.peer, "peer closed connection");
                        ConnectionState::Closed
                    }
                    RequestOutcome::TimedOutIdle => {
                        debug!(peer = %self.peer, "idle connection timed out");
                        ConnectionState::Closed
                    }
                },
                ConnectionState::Processing(request) => {
                    let response = self.handler.handle(request).await;
                    let close = response.must_close();
                    ConnectionState::Writing(ResponseWriter::new(&response), close)
                }
                ConnectionState::Writing(mut writer, close) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    if close {
                        ConnectionState::Closed
                    } else {
                        ConnectionState::Reading
                    }
                }
                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Reads from the stream until the buffer holds a complete request head,
    /// then parses it off the front, leaving any pipelined followers in
    /// place.
    ///
    /// The deadline is absolute for the whole request: a client trickling
    /// bytes gets no more total time than a silent one.
    async fn read_request(&mut self) -> anyhow::Result<RequestOutcome> {
        let deadline = Instant::now() + self.read_timeout;

        loop {
            match parse_request(&self.buffer, false) {
                ParseOutcome::Success(request, consumed) => {
                    self.buffer.advance(consumed);
                    return Ok(RequestOutcome::Parsed(request));
                }
                ParseOutcome::Malformed(error) => {
                    return Ok(RequestOutcome::Malformed(error));
                }
                // StreamEnded cannot happen before at_eof is passed below
                ParseOutcome::NeedMoreInput | ParseOutcome::StreamEnded => {}
            }

            if self.buffer.len() > MAX_HEAD_BYTES {
                return Ok(RequestOutcome::Malformed(ParseError::RequestHeadTooLarge));
            }

            let read = match timeout_at(deadline, self.stream.read_buf(&mut self.buffer)).await {
                Ok(result) => result?,
                Err(_) => {
                    return Ok(if self.buffer.is_empty() {
                        RequestOutcome::TimedOutIdle
                    } else {
                        RequestOutcome::TimedOutMidRequest
                    });
                }
            };

            if read == 0 {
                // EOF. Parse once more knowing no more bytes will come, so
                // a truncated head classifies as malformed instead of
                // waiting forever.
                return Ok(match parse_request(&self.buffer, true) {
                    ParseOutcome::Success(request, consumed) => {
                        self.buffer.advance(consumed);
                        RequestOutcome::Parsed(request)
                    }
                    ParseOutcome::Malformed(error) => RequestOutcome::Malformed(error),
                    ParseOutcome::NeedMoreInput | ParseOutcome::StreamEnded => {
                        RequestOutcome::PeerClosed
                    }
                });
            }
        }
    }
}
