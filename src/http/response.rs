use bytes::{BufMut, Bytes, BytesMut};

const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP status codes the server produces.
///
/// - `Ok` (200): File served
/// - `NotFound` (404): No file behind the target
/// - `NotImplemented` (501): Method other than GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Status line and the fixed header set sent ahead of every body.
#[derive(Debug, Clone)]
pub struct ResponseHead<'a> {
    pub status: StatusCode,
    /// Value of the `Server` header
    pub server: &'a str,
    pub content_length: u64,
    pub content_type: &'a str,
}

impl ResponseHead<'_> {
    /// Serialises the head, blank line included.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(128);

        buf.put_slice(
            format!(
                "{} {} {}\r\n",
                HTTP_VERSION,
                self.status.as_u16(),
                self.status.reason_phrase()
            )
            .as_bytes(),
        );
        buf.put_slice(format!("Server: {}\r\n", self.server).as_bytes());
        buf.put_slice(b"Connection: close\r\n");
        buf.put_slice(format!("Content-Length: {}\r\n", self.content_length).as_bytes());
        buf.put_slice(format!("Content-Type: {}\r\n", self.content_type).as_bytes());
        buf.put_slice(b"\r\n");

        buf.freeze()
    }
}

/// HTML page describing an error with `resource`.
pub fn error_body(status: StatusCode, resource: &str, long_description: &str) -> String {
    format!(
        "<html><title>Error</title><body>\r\n\
         <h1>{}: {}</h1>\r\n\
         <p>{}: {}</p>\r\n\
         </body></html>\r\n",
        status.as_u16(),
        status.reason_phrase(),
        long_description,
        escape_html(resource),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
