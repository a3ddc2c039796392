//! Boundary to the concrete network transport.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// What a transport call produced when it did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportResponse<B> {
    /// 2xx with a decoded body.
    Success(B),
    /// Any other status, with the undecoded error body if the server sent one.
    Rejected { status: u16, body: Option<String> },
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Other(String),
}

/// A single remote call, consumed when executed.
pub trait RemoteCall: Send {
    type Body: Send;

    /// Short label for logs, e.g. `"POST /friends"`.
    fn describe(&self) -> String;

    fn execute(self) -> impl Future<Output = Result<TransportResponse<Self::Body>, TransportError>> + Send;
}

/// Answers whether a network path is currently available.
pub trait ConnectivityProbe: Send + Sync {
    fn is_connected(&self) -> bool;
}

impl<F> ConnectivityProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_connected(&self) -> bool {
        self()
    }
}

/// Shared on/off switch for hosts that learn about connectivity from callbacks.
#[derive(Debug, Clone)]
pub struct NetworkFlag {
    connected: Arc<AtomicBool>,
}

impl NetworkFlag {
    #[must_use]
    pub fn new(connected: bool) -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(connected)),
        }
    }

    pub fn set(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Default for NetworkFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityProbe for NetworkFlag {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
