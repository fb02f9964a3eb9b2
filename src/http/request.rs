/// HTTP request methods.
///
/// Every token in the method position parses to a `Method`; only `GET` is
/// served; everything else is answered with 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
    /// Any other token, kept verbatim
    Other(String),
}

/// A parsed request line plus the raw header lines that followed it.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// The request target exactly as sent (e.g. "/index.html")
    pub target: String,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
    /// Header lines with the line terminator stripped, in arrival order.
    /// Not interpreted by the server.
    pub headers: Vec<String>,
}

impl Method {
    /// Maps a method token to a `Method`, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::GET);
    /// assert_eq!(Method::from_token("BREW"), Method::Other("BREW".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            _ => Method::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(s) => s,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Method::GET)
    }
}

impl Request {
    /// Builds a request from a request line, using its first three
    /// whitespace-separated tokens. Returns `None` if there are fewer.
    pub fn from_request_line(line: &str) -> Option<Self> {
        let mut parts = line.split_ascii_whitespace();

        let method = parts.next()?;
        let target = parts.next()?;
        let version = parts.next()?;

        Some(Request {
            method: Method::from_token(method),
            target: target.to_string(),
            version: version.to_string(),
            headers: Vec::new(),
        })
    }
}
