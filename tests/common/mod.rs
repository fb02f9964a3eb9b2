//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::{Context, Poll};

use docserve::config::Config;
use docserve::http::connection::Connection;
use docserve::http::response::StatusCode;
use docserve::server::ServerContext;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};

/// One scripted outcome of a read call.
pub enum Step {
    Data(Vec<u8>),
    Interrupted,
    Fail,
}

/// Reader that plays back a fixed script; end of script is end of stream.
pub struct ScriptedReader {
    steps: VecDeque<Step>,
    pub reads: usize,
}

impl ScriptedReader {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            reads: 0,
        }
    }

    /// Delivers `data` in chunks of at most `chunk` bytes per read.
    pub fn chunked(data: &[u8], chunk: usize) -> Self {
        Self::new(data.chunks(chunk).map(|c| Step::Data(c.to_vec())).collect())
    }
}

impl AsyncRead for ScriptedReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.reads += 1;

        match this.steps.pop_front() {
            None => Poll::Ready(Ok(())),
            Some(Step::Data(mut data)) => {
                let n = data.len().min(buf.remaining());
                buf.put_slice(&data[..n]);
                if n < data.len() {
                    this.steps.push_front(Step::Data(data.split_off(n)));
                }
                Poll::Ready(Ok(()))
            }
            Some(Step::Interrupted) => {
                Poll::Ready(Err(io::Error::from(io::ErrorKind::Interrupted)))
            }
            Some(Step::Fail) => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
        }
    }
}

/// Writer that accepts at most `max_chunk` bytes per call and can be told to
/// report an interruption on every `interrupt_every`-th call.
pub struct ChunkedWriter {
    pub data: Vec<u8>,
    pub calls: usize,
    max_chunk: usize,
    interrupt_every: Option<usize>,
}

impl ChunkedWriter {
    pub fn new(max_chunk: usize) -> Self {
        Self {
            data: Vec::new(),
            calls: 0,
            max_chunk,
            interrupt_every: None,
        }
    }

    pub fn interrupting(max_chunk: usize, every: usize) -> Self {
        Self {
            interrupt_every: Some(every),
            ..Self::new(max_chunk)
        }
    }
}

impl AsyncWrite for ChunkedWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        this.calls += 1;

        if let Some(every) = this.interrupt_every {
            if this.calls % every == 0 {
                return Poll::Ready(Err(io::Error::from(io::ErrorKind::Interrupted)));
            }
        }

        let n = buf.len().min(this.max_chunk);
        this.data.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Writer whose every write fails with `kind`, or returns `Ok(0)` when
/// `kind` is `None`.
pub struct BrokenWriter {
    pub kind: Option<io::ErrorKind>,
}

impl AsyncWrite for BrokenWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.kind {
            Some(kind) => Poll::Ready(Err(io::Error::from(kind))),
            None => Poll::Ready(Ok(0)),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Bidirectional stream fed by a [`ScriptedReader`] that records whether it
/// was shut down. Writes succeed unless `fail_writes` is set.
pub struct FaultyStream {
    pub input: ScriptedReader,
    pub fail_writes: bool,
    pub shut_down: Arc<AtomicBool>,
}

impl FaultyStream {
    pub fn new(input: ScriptedReader, fail_writes: bool) -> (Self, Arc<AtomicBool>) {
        let shut_down = Arc::new(AtomicBool::new(false));
        let stream = Self {
            input,
            fail_writes,
            shut_down: Arc::clone(&shut_down),
        };
        (stream, shut_down)
    }
}

impl AsyncRead for FaultyStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().input).poll_read(cx, buf)
    }
}

impl AsyncWrite for FaultyStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail_writes {
            Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
        } else {
            Poll::Ready(Ok(buf.len()))
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.shut_down.store(true, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

/// Scratch document root, removed on drop.
pub struct TempRoot {
    pub path: PathBuf,
}

impl TempRoot {
    pub fn new(tag: &str) -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "docserve-{}-{}-{}",
            tag,
            std::process::id(),
            n
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let file = self.path.join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&file, contents).unwrap();
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn context_for(root: &Path) -> Arc<ServerContext> {
    let mut cfg = Config::default();
    cfg.static_files.root = root.to_path_buf();
    Arc::new(ServerContext::new(cfg))
}

/// Runs one connection over an in-memory pipe: sends `request`, closes the
/// client's write side, and collects everything the server wrote.
pub async fn exchange(ctx: Arc<ServerContext>, request: &[u8]) -> (Option<StatusCode>, Vec<u8>) {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let handle = tokio::spawn(Connection::new(server, ctx).run());

    client.write_all(request).await.unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    let status = handle.await.unwrap().unwrap();
    (status, response)
}

/// A response split into status code, header lines and body.
pub struct Parsed {
    pub status_line: String,
    pub code: u16,
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl Parsed {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|h| {
            let (k, v) = h.split_once(':')?;
            k.eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }
}

pub fn parse_response(raw: &[u8]) -> Parsed {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = std::str::from_utf8(&raw[..split]).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap().to_string();
    let code = status_line
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();

    Parsed {
        status_line,
        code,
        headers: lines.map(str::to_string).collect(),
        body: raw[split + 4..].to_vec(),
    }
}
