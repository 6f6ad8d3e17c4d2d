use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::config::Config;
use crate::game::router::GameRouter;
use crate::http::parser::{parse_http_request_with, ParseError, ParseLimits};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::{ResponseWriter, WriterConfig};

/// Settings shared by every connection the server accepts.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub read_timeout: Duration,
    pub limits: ParseLimits,
    pub writer: WriterConfig,
}

impl ConnectionSettings {
    pub fn from_config(cfg: &Config, server_id: String) -> Self {
        Self {
            read_timeout: cfg.read_timeout(),
            limits: ParseLimits::from(&cfg.http),
            writer: WriterConfig {
                chunk_threshold: cfg.http.chunk_threshold,
                server_id,
            },
        }
    }
}

/// One request/response exchange over an accepted stream.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    router: Arc<GameRouter>,
    settings: Arc<ConnectionSettings>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

enum ReadOutcome {
    Request(Request),
    Rejected(ParseError),
    /// Peer went away before sending anything.
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<GameRouter>, settings: Arc<ConnectionSettings>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            router,
            settings,
        }
    }

    /// Drives the exchange to completion. The connection is never reused.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Rejected(err) => {
                            tracing::debug!(error = %err, status = err.status().as_u16(), "Malformed request");
                            let response = Response::empty(err.status());
                            ConnectionState::Writing(ResponseWriter::new(&response, &self.settings.writer, false))
                        }
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.router.handle(&req).await;

                    tracing::info!(
                        method = req.method.as_str(),
                        uri = %req.uri,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    let head_only = req.method == Method::HEAD;
                    let writer = ResponseWriter::new(&response, &self.settings.writer, head_only);
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // No keep-alive: one response per connection.
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::trace!(error = %e, "Shutdown after response failed");
        }

        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request_with(&self.buffer, &self.settings.limits) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    return Ok(ReadOutcome::Rejected(e));
                }
            }

            let n = timeout(self.settings.read_timeout, self.stream.read_buf(&mut self.buffer))
                .await
                .map_err(|_| anyhow::anyhow!("read timed out after {:?}", self.settings.read_timeout))??;

            if n == 0 {
                // Client closed its side; a partial request still gets an answer
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Closed);
                }
                return Ok(ReadOutcome::Rejected(ParseError::Incomplete));
            }
        }
    }
}
