//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use relay_logger::sinks::{GatePolicy, Payload};
use relay_logger::{
    Environment, LogOptions, Logger, PackageInfo, Sink, SinkError, SinkKind, SinkTarget, Transport,
    TransportFactory,
};
use relay_logger::message::FormattedRecord;

/// One HTTP request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        202 => "202 Accepted",
        400 => "400 Bad Request",
        401 => "401 Unauthorized",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a mock backend on an ephemeral port that answers every request
/// with `status` and forwards what it received.
pub async fn start_capturing_backend(
    status: u16,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    start_programmable_backend(move || async move { (status, String::new()) }).await
}

/// Start a programmable mock backend with async support.
pub async fn start_programmable_backend<F, Fut>(
    f: F,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let _ = tx.send(request);
                        let (status, body) = f().await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// How a recording transport answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    Fail,
    Hang,
}

/// Transport double that keeps every payload it is given.
pub struct RecordingTransport {
    behavior: Behavior,
    pub payloads: Mutex<Vec<Payload>>,
    pub resets: AtomicUsize,
}

impl RecordingTransport {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            payloads: Mutex::new(Vec::new()),
            resets: AtomicUsize::new(0),
        }
    }

    pub fn sent(&self) -> Vec<Payload> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().iter().map(Payload::as_text).collect()
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl Transport for RecordingTransport {
    fn log(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>> {
        self.payloads.lock().unwrap().push(payload);
        let behavior = self.behavior;
        async move {
            match behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail => Err(SinkError::Status(503)),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(())
                }
            }
        }
        .boxed()
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory handing out one recording transport per sink kind.
#[derive(Default)]
pub struct RecordingFactory {
    behaviors: Mutex<HashMap<SinkKind, Behavior>>,
    transports: Mutex<HashMap<SinkKind, Arc<RecordingTransport>>>,
    pub built: Mutex<Vec<SinkTarget>>,
}

impl RecordingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_behavior(self: Arc<Self>, kind: SinkKind, behavior: Behavior) -> Arc<Self> {
        self.behaviors.lock().unwrap().insert(kind, behavior);
        self
    }

    /// The transport most recently built for `kind`.
    pub fn transport(&self, kind: SinkKind) -> Arc<RecordingTransport> {
        self.transports
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| panic!("no transport built for {kind:?}"))
    }

    pub fn build_count(&self) -> usize {
        self.built.lock().unwrap().len()
    }
}

impl TransportFactory for RecordingFactory {
    fn build(&self, target: &SinkTarget) -> Result<Arc<dyn Transport>, SinkError> {
        self.built.lock().unwrap().push(target.clone());
        let kind = target.kind();
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(&kind)
            .copied()
            .unwrap_or(Behavior::Succeed);
        let transport = Arc::new(RecordingTransport::new(behavior));
        self.transports.lock().unwrap().insert(kind, transport.clone());
        Ok(transport)
    }
}

/// A custom sink registered from code.
#[derive(Debug)]
pub struct CollectingSink {
    name: String,
    policy: GatePolicy,
    pub lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new(name: &str, policy: GatePolicy) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            policy,
            lines: Mutex::new(Vec::new()),
        })
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Sink for CollectingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> GatePolicy {
        self.policy
    }

    fn format(&self, record: &FormattedRecord) -> Payload {
        Payload::text(record, record.remote_text.clone())
    }

    fn send(&self, payload: Payload) -> BoxFuture<'_, Result<(), SinkError>> {
        self.lines.lock().unwrap().push(payload.as_text());
        async { Ok(()) }.boxed()
    }
}

/// Local writer capturing every line.
pub fn capture_local() -> (LogOptions, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    let options = LogOptions::new().local_logger(move |line| sink.lock().unwrap().push(line.to_string()));
    (options, lines)
}

pub fn test_logger(env: Environment, factory: Arc<RecordingFactory>, options: LogOptions) -> Logger {
    Logger::builder()
        .environment(env)
        .package(PackageInfo::new("svc", "1.0.0"))
        .transports(factory)
        .options(options)
        .build()
}
