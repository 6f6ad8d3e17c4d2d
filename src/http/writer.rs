use std::time::SystemTime;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Per-process settings every serialized response depends on.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Bodies longer than this are chunked, in slices of this size.
    pub chunk_threshold: usize,
    /// Value of the `Server` header.
    pub server_id: String,
}

/// Serializes `resp` into wire bytes.
///
/// Adds `Date`, `Server`, `Connection: close` and the body framing. With
/// `head_only` the framing headers still describe the body but the body
/// itself is left out.
pub fn serialize_response(resp: &Response, cfg: &WriterConfig, head_only: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    push_header(&mut buf, "Date", &httpdate::fmt_http_date(SystemTime::now()));
    push_header(&mut buf, "Server", &cfg.server_id);
    push_header(&mut buf, "Connection", "close");

    // Headers
    for (k, v) in &resp.headers {
        push_header(&mut buf, k, v);
    }

    let has_body = resp.status.allows_body();
    let chunked = has_body && resp.body.len() > cfg.chunk_threshold;

    if chunked {
        push_header(&mut buf, "Transfer-Encoding", "chunked");
    } else if has_body {
        push_header(&mut buf, "Content-Length", &resp.body.len().to_string());
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    if !has_body || head_only {
        return buf;
    }

    // Body
    if chunked {
        write_chunks(&mut buf, &resp.body, cfg.chunk_threshold);
    } else {
        buf.extend_from_slice(&resp.body);
    }

    buf
}

/// Emits `body` as `<hex-len>\r\n<bytes>\r\n` slices of at most
/// `chunk_size` bytes, followed by the terminating zero-length chunk.
pub fn write_chunks(buf: &mut Vec<u8>, body: &[u8], chunk_size: usize) {
    for chunk in body.chunks(chunk_size.max(1)) {
        buf.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        buf.extend_from_slice(chunk);
        buf.extend_from_slice(b"\r\n");
    }
    buf.extend_from_slice(b"0\r\n\r\n");
}

fn push_header(buf: &mut Vec<u8>, key: &str, value: &str) {
    buf.extend_from_slice(key.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response, cfg: &WriterConfig, head_only: bool) -> Self {
        Self {
            buffer: serialize_response(response, cfg, head_only),
            written: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
