use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::mime::mime_for;
use crate::http::response::{error_body, ResponseHead, StatusCode};

/// Chunk size used when copying a file to the client.
const FILE_CHUNK: usize = 4096;

pub const NOT_FOUND_DESCRIPTION: &str = "File not found or couldn't be opened";
pub const NOT_IMPLEMENTED_DESCRIPTION: &str = "This method is not yet supported";

/// Writes all of `bytes`, resuming after short writes and retrying
/// interrupted ones. Any other failure aborts.
pub async fn write_exact<W>(stream: &mut W, bytes: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;

    while written < bytes.len() {
        match stream.write(&bytes[written..]).await {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    stream.flush().await
}

/// Composes and sends responses on one connection's stream.
pub struct ResponseWriter<'a, W> {
    stream: &'a mut W,
    server: &'a str,
}

impl<'a, W: AsyncWrite + Unpin> ResponseWriter<'a, W> {
    pub fn new(stream: &'a mut W, server: &'a str) -> Self {
        Self { stream, server }
    }

    /// Sends `path` as a 200 response announcing `size` bytes, then copies
    /// the file until `size` bytes are out or the file runs dry.
    ///
    /// Falls back to a 404 when the file cannot be opened. Returns the status
    /// sent and the number of body bytes written.
    pub async fn send_file(&mut self, path: &Path, size: u64) -> io::Result<(StatusCode, u64)> {
        let mut file = match File::open(path).await {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "open failed");
                let resource = path.to_string_lossy();
                let sent = self
                    .send_error(&resource, StatusCode::NotFound, NOT_FOUND_DESCRIPTION)
                    .await?;
                return Ok((StatusCode::NotFound, sent));
            }
        };

        let head = ResponseHead {
            status: StatusCode::Ok,
            server: self.server,
            content_length: size,
            content_type: mime_for(path),
        };
        write_exact(&mut *self.stream, &head.to_bytes()).await?;

        let sent = copy_body(&mut file, &mut *self.stream, size).await?;
        Ok((StatusCode::Ok, sent))
    }

    /// Sends an HTML error page naming `resource`. Returns the body length.
    pub async fn send_error(
        &mut self,
        resource: &str,
        status: StatusCode,
        long_description: &str,
    ) -> io::Result<u64> {
        let body = error_body(status, resource, long_description);

        let head = ResponseHead {
            status,
            server: self.server,
            content_length: body.len() as u64,
            content_type: "text/html",
        };
        write_exact(&mut *self.stream, &head.to_bytes()).await?;
        write_exact(&mut *self.stream, body.as_bytes()).await?;

        Ok(body.len() as u64)
    }
}

/// Copies at most `limit` bytes from `src` to `dst`.
async fn copy_body<R, W>(src: &mut R, dst: &mut W, limit: u64) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunk = [0u8; FILE_CHUNK];
    let mut sent: u64 = 0;

    while sent < limit {
        let want = (limit - sent).min(FILE_CHUNK as u64) as usize;

        let n = match src.read(&mut chunk[..want]).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        write_exact(dst, &chunk[..n]).await?;
        sent += n as u64;
    }

    Ok(sent)
}
