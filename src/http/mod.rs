//! HTTP request handling for one-shot static file responses.
//!
//! Every connection carries exactly one request and is closed after the
//! response.
//!
//! # Architecture
//!
//! - **`reader`**: Fixed-capacity buffered reads ("up to N bytes", "one line")
//! - **`parser`**: Request line and header block, read through the buffered reader
//! - **`request`**: Request and method representation
//! - **`resolve`**: Maps a request target to a path under the served root
//! - **`response`**: Status codes, response head and error page composition
//! - **`writer`**: Writes exact byte counts, sends files and error pages
//! - **`mime`**: Content-Type lookup by file name
//! - **`connection`**: The per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!   Start ──no data / read error──────────────────────┐
//!     │ line read                                     │
//!     ▼                                               │
//!   LineRead ──fewer than three tokens────────────────┤
//!     │ parsed                                        │
//!     ▼                                               │
//!   MethodCheck ──not GET → 501───────────────────────┤
//!     │                                               │
//!     ▼                                               │
//!   Headers ── drained to blank line                  │
//!     │                                               │
//!     ▼                                               │
//!   Resolve ── root + target (+ index)                │
//!     │                                               │
//!     ▼                                               │
//!   Stat ──no regular file → 404──────────────────────┤
//!     │                                               │
//!     ▼                                               │
//!   Serve ── under the file service lock → 200        │
//!     │                                               │
//!     ▼                                               ▼
//!   Close ◄───────────────────────────────────────────┘
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod resolve;
pub mod response;
pub mod writer;
