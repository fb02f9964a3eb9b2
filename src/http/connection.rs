use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::http::parser::{parse_request_line, read_headers, read_request_line};
use crate::http::reader::BufferedReader;
use crate::http::request::Request;
use crate::http::resolve::{resolve, ResolvedPath};
use crate::http::response::StatusCode;
use crate::http::writer::{ResponseWriter, NOT_FOUND_DESCRIPTION, NOT_IMPLEMENTED_DESCRIPTION};
use crate::server::context::ServerContext;

/// Handles exactly one request on one connection.
pub struct Connection<S> {
    reader: BufferedReader<S>,
    ctx: Arc<ServerContext>,
    state: ConnectionState,
    status: Option<StatusCode>,
}

pub enum ConnectionState {
    Start,
    LineRead(String),
    MethodCheck(Request),
    Headers(Request),
    Resolve(Request),
    Stat(PathBuf),
    Serve(ResolvedPath),
    Close,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S, ctx: Arc<ServerContext>) -> Self {
        Self {
            reader: BufferedReader::new(stream),
            ctx,
            state: ConnectionState::Start,
            status: None,
        }
    }

    /// Drives the connection to `Close` and shuts the stream down.
    ///
    /// Returns the status sent to the client, or `None` if the connection was
    /// closed without a response (no data, or an unparseable request line).
    /// An I/O failure in any state also ends in `Close`; the error is
    /// returned after the shutdown.
    pub async fn run(mut self) -> anyhow::Result<Option<StatusCode>> {
        let mut failure = None;

        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Close);

            if let ConnectionState::Close = state {
                // The peer may already be gone.
                let _ = self.reader.get_mut().shutdown().await;
                break;
            }

            self.state = match self.step(state).await {
                Ok(next) => next,
                Err(e) => {
                    failure = Some(e);
                    ConnectionState::Close
                }
            };
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(self.status),
        }
    }

    async fn step(&mut self, state: ConnectionState) -> anyhow::Result<ConnectionState> {
        let next = match state {
            ConnectionState::Start => match read_request_line(&mut self.reader).await? {
                Some(line) => ConnectionState::LineRead(line),
                None => {
                    debug!("Connection closed before request line");
                    ConnectionState::Close
                }
            },

            ConnectionState::LineRead(line) => match parse_request_line(&line) {
                Ok(request) => ConnectionState::MethodCheck(request),
                Err(e) => {
                    debug!("Dropping connection: {}", e);
                    ConnectionState::Close
                }
            },

            ConnectionState::MethodCheck(request) => {
                if request.method.is_supported() {
                    ConnectionState::Headers(request)
                } else {
                    self.respond_error(
                        request.method.as_str(),
                        StatusCode::NotImplemented,
                        NOT_IMPLEMENTED_DESCRIPTION,
                    )
                    .await?;
                    ConnectionState::Close
                }
            }

            ConnectionState::Headers(mut request) => {
                read_headers(&mut self.reader, &mut request).await?;
                ConnectionState::Resolve(request)
            }

            ConnectionState::Resolve(request) => {
                let files = &self.ctx.config().static_files;
                let path = resolve(&files.root, &request.target, &files.index);
                debug!(request_target = %request.target, path = %path.display(), "Resolved");
                ConnectionState::Stat(path)
            }

            ConnectionState::Stat(path) => match ResolvedPath::stat(&path).await {
                Some(resolved) => ConnectionState::Serve(resolved),
                None => {
                    self.respond_error(
                        &path.to_string_lossy(),
                        StatusCode::NotFound,
                        NOT_FOUND_DESCRIPTION,
                    )
                    .await?;
                    ConnectionState::Close
                }
            },

            ConnectionState::Serve(resolved) => {
                let _guard = self.ctx.lock_file_service().await;

                let server = self.ctx.config().server.server_name.as_str();
                let mut writer = ResponseWriter::new(self.reader.get_mut(), server);
                let (status, sent) = writer.send_file(&resolved.path, resolved.size).await?;

                debug!(status = status.as_u16(), bytes = sent, "Response sent");
                self.status = Some(status);
                ConnectionState::Close
            }

            ConnectionState::Close => ConnectionState::Close,
        };

        Ok(next)
    }

    async fn respond_error(
        &mut self,
        resource: &str,
        status: StatusCode,
        long_description: &str,
    ) -> std::io::Result<()> {
        let server = self.ctx.config().server.server_name.as_str();
        ResponseWriter::new(self.reader.get_mut(), server)
            .send_error(resource, status, long_description)
            .await?;

        debug!(status = status.as_u16(), resource, "Error response sent");
        self.status = Some(status);
        Ok(())
    }
}
