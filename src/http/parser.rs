use std::io;

use tokio::io::AsyncRead;
use tracing::debug;

use crate::http::reader::BufferedReader;
use crate::http::request::Request;

/// Size of the line buffer, end marker included.
pub const LINE_CAPACITY: usize = 4096;

/// Header lines kept on a request; later lines are still consumed but dropped.
pub const MAX_RETAINED_HEADERS: usize = 100;

/// The line that ends the header block.
const HEADER_TERMINATOR: &[u8] = b"\r\n";

#[derive(Debug)]
pub enum ParseError {
    /// Fewer than three tokens on the request line.
    InvalidRequestLine(String),
    Io(io::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequestLine(line) => {
                write!(f, "invalid request line: {:?}", line)
            }
            ParseError::Io(e) => write!(f, "read failed: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Reads the request line as text, terminator included.
///
/// `Ok(None)` means the client closed the connection without sending
/// anything. Lines longer than [`LINE_CAPACITY`] - 1 bytes are cut short.
pub async fn read_request_line<S>(
    reader: &mut BufferedReader<S>,
) -> Result<Option<String>, ParseError>
where
    S: AsyncRead + Unpin,
{
    let mut line = [0u8; LINE_CAPACITY];

    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Ok(None);
    }

    let text = String::from_utf8_lossy(&line[..n]).into_owned();
    debug!(request_line = %text.trim_end(), "Request line received");
    Ok(Some(text))
}

/// Splits a request line into method, target and version.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    Request::from_request_line(line)
        .ok_or_else(|| ParseError::InvalidRequestLine(line.trim_end().to_string()))
}

/// Consumes header lines up to and including the blank line, storing the
/// first [`MAX_RETAINED_HEADERS`] in `request.headers`. End of stream also
/// ends the header block.
pub async fn read_headers<S>(
    reader: &mut BufferedReader<S>,
    request: &mut Request,
) -> Result<(), ParseError>
where
    S: AsyncRead + Unpin,
{
    let mut line = [0u8; LINE_CAPACITY];

    loop {
        let n = reader.read_line(&mut line).await?;

        if n == 0 {
            debug!("Stream ended inside header block");
            return Ok(());
        }

        let raw = &line[..n];
        if raw == HEADER_TERMINATOR {
            return Ok(());
        }

        let header = String::from_utf8_lossy(raw);
        let header = header.trim_end_matches(['\r', '\n']);
        debug!(header, "Header line");
        if request.headers.len() < MAX_RETAINED_HEADERS {
            request.headers.push(header.to_string());
        }
    }
}
