use std::path::PathBuf;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Chunk size for streaming file bodies
const BUFFER_SIZE: usize = 8192;

/// Serializes the response head: status line, headers in sorted-by-name
/// order, then the blank separator line. Sorting keeps the byte output
/// deterministic for a given header set.
fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.proto,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    let mut headers: Vec<_> = resp.headers.iter().collect();
    headers.sort();
    for (name, value) in headers {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Head/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one serialized response to a stream: the head from an in-memory
/// buffer, the body (when the response names a file) streamed straight off
/// disk in chunks. Nothing is retried; an error anywhere abandons the write.
#[derive(Debug)]
pub struct ResponseWriter {
    head: Vec<u8>,
    written: usize,
    file_path: Option<PathBuf>,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            head: serialize_head(response),
            written: 0,
            file_path: response.file_path.clone(),
        }
    }

    /// Writes head and body and flushes. Returns only after every byte has
    /// been handed to the transport, or fails on the first write error.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.head.len() {
            let n = stream.write(&self.head[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        if let Some(path) = &self.file_path {
            let mut file = File::open(path)
                .await
                .with_context(|| format!("opening response body {}", path.display()))?;
            let mut buf = [0u8; BUFFER_SIZE];

            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                stream.write_all(&buf[..n]).await?;
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
