#![allow(dead_code)]

use dispatch::{RemoteCall, TransportError, TransportResponse};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Value),
    Rejected(u16, Option<String>),
    Broken,
}

/// Scripted transport call that counts how often it was actually sent.
#[derive(Debug, Clone)]
pub struct FakeCall {
    label: &'static str,
    reply: Reply,
    delay: Duration,
    sent: Arc<AtomicUsize>,
}

impl FakeCall {
    #[must_use]
    pub fn new(label: &'static str, reply: Reply) -> Self {
        Self {
            label,
            reply,
            delay: Duration::ZERO,
            sent: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn spy(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.sent)
    }
}

impl RemoteCall for FakeCall {
    type Body = Value;

    fn describe(&self) -> String {
        self.label.to_string()
    }

    async fn execute(self) -> Result<TransportResponse<Value>, TransportError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.reply {
            Reply::Ok(body) => Ok(TransportResponse::Success(body)),
            Reply::Rejected(status, body) => Ok(TransportResponse::Rejected { status, body }),
            Reply::Broken => Err(TransportError::Other("connection reset by peer".to_string())),
        }
    }
}

pub fn sent(spy: &AtomicUsize) -> usize {
    spy.load(Ordering::SeqCst)
}
