//! Scripted endpoint and connection doubles with fault injection.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use tunnel_responder::error::ServeError;
use tunnel_responder::server::{Endpoint, ListenerProvider};

#[derive(Debug, Clone)]
pub enum ReadBehavior {
    Data(Vec<u8>),
    Eof,
    Fail,
}

#[derive(Debug, Clone, Copy)]
pub enum WriteBehavior {
    Accept,
    Fail,
    /// Reports zero bytes written.
    Zero,
    /// Accepts this many bytes in total, then fails.
    FailAfter(usize),
}

#[derive(Debug, Clone)]
pub struct Script {
    pub read: ReadBehavior,
    pub write: WriteBehavior,
}

impl Script {
    pub fn request(data: &[u8]) -> Self {
        Self {
            read: ReadBehavior::Data(data.to_vec()),
            write: WriteBehavior::Accept,
        }
    }

    pub fn silent() -> Self {
        Self {
            read: ReadBehavior::Eof,
            write: WriteBehavior::Accept,
        }
    }

    pub fn new(read: ReadBehavior, write: WriteBehavior) -> Self {
        Self { read, write }
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub accepted: AtomicUsize,
    pub closed: AtomicUsize,
    pub open: AtomicUsize,
    pub max_open: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub endpoint_closes: AtomicUsize,
    /// Bytes each connection received, in close order.
    pub written: Mutex<Vec<Vec<u8>>>,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.written.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct MockConn {
    read: ReadBehavior,
    write: WriteBehavior,
    read_done: bool,
    output: Vec<u8>,
    counters: Arc<Counters>,
}

impl AsyncRead for MockConn {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.read_done {
            return Poll::Ready(Ok(()));
        }
        self.read_done = true;

        match &self.read {
            ReadBehavior::Data(data) => {
                let n = data.len().min(buf.remaining());
                buf.put_slice(&data[..n]);
                Poll::Ready(Ok(()))
            }
            ReadBehavior::Eof => Poll::Ready(Ok(())),
            ReadBehavior::Fail => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "injected read failure",
            ))),
        }
    }
}

impl AsyncWrite for MockConn {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.write {
            WriteBehavior::Accept => {
                self.output.extend_from_slice(buf);
                Poll::Ready(Ok(buf.len()))
            }
            WriteBehavior::Fail => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "injected write failure",
            ))),
            WriteBehavior::Zero => Poll::Ready(Ok(0)),
            WriteBehavior::FailAfter(limit) => {
                let room = limit.saturating_sub(self.output.len());
                if room == 0 {
                    return Poll::Ready(Err(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "injected write failure",
                    )));
                }
                let n = room.min(buf.len());
                self.output.extend_from_slice(&buf[..n]);
                Poll::Ready(Ok(n))
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

impl Drop for MockConn {
    fn drop(&mut self) {
        self.counters
            .written
            .lock()
            .unwrap()
            .push(std::mem::take(&mut self.output));
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        self.counters.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// What `accept` does once the scripts run out.
#[derive(Debug, Clone, Copy)]
pub enum Exhausted {
    Fail,
    Pending,
}

#[derive(Debug)]
pub struct MockEndpoint {
    scripts: VecDeque<Script>,
    exhausted: Exhausted,
    pub counters: Arc<Counters>,
}

impl MockEndpoint {
    pub fn new(scripts: Vec<Script>, exhausted: Exhausted) -> Self {
        Self {
            scripts: scripts.into(),
            exhausted,
            counters: Arc::new(Counters::default()),
        }
    }
}

impl Endpoint for MockEndpoint {
    type Conn = MockConn;

    fn address(&self) -> String {
        "mock://endpoint".to_string()
    }

    async fn accept(&mut self) -> Result<MockConn, ServeError> {
        let Some(script) = self.scripts.pop_front() else {
            return match self.exhausted {
                Exhausted::Fail => Err(ServeError::accept(io::Error::other("endpoint broken"))),
                Exhausted::Pending => std::future::pending().await,
            };
        };

        let counters = Arc::clone(&self.counters);
        counters.accepted.fetch_add(1, Ordering::SeqCst);
        let open = counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        counters.max_open.fetch_max(open, Ordering::SeqCst);

        Ok(MockConn {
            read: script.read,
            write: script.write,
            read_done: false,
            output: Vec::new(),
            counters,
        })
    }

    async fn close(&mut self) {
        self.counters.endpoint_closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct MockProvider(pub MockEndpoint);

impl ListenerProvider for MockProvider {
    type Endpoint = MockEndpoint;

    async fn bind(self) -> Result<MockEndpoint, ServeError> {
        Ok(self.0)
    }
}

/// Never produces an endpoint; counts how far `run` got.
#[derive(Debug)]
pub struct FailingProvider {
    pub counters: Arc<Counters>,
}

impl ListenerProvider for FailingProvider {
    type Endpoint = MockEndpoint;

    async fn bind(self) -> Result<MockEndpoint, ServeError> {
        Err(ServeError::Bind {
            addr: "127.0.0.1:1".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        })
    }
}
