#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Turns one remote call into an `Outcome<ErrorKind, T>`.

use crate::config::DispatchConfig;
use crate::failure::{classify_raw, ErrorKind};
use crate::outcome::Outcome;
use crate::transport::{ConnectivityProbe, RemoteCall, TransportError, TransportResponse};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};

pub struct RequestExecutor<P> {
    probe: P,
    timeout: Option<Duration>,
}

impl<P: ConnectivityProbe> RequestExecutor<P> {
    pub const fn new(probe: P) -> Self {
        Self {
            probe,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_config(probe: P, config: &DispatchConfig) -> Self {
        Self {
            probe,
            timeout: config.request_timeout(),
        }
    }

    /// Runs `call` and maps its decoded body through `transform`.
    ///
    /// Never fails outright: offline, rejected responses, transport errors,
    /// timeouts and panics all come back as `Outcome::Failure`.
    pub async fn execute<C, T, M>(&self, call: C, transform: M) -> Outcome<ErrorKind, T>
    where
        C: RemoteCall,
        M: FnOnce(C::Body) -> T + Send,
    {
        let label = call.describe();
        if !self.probe.is_connected() {
            debug!(call = %label, "skipping call, network unreachable");
            return Outcome::Failure(ErrorKind::NoConnectivity);
        }

        let attempt = AssertUnwindSafe(async move {
            let response = self.await_response(call).await?;
            Ok::<_, TransportError>(match response {
                TransportResponse::Success(body) => Outcome::Success(transform(body)),
                TransportResponse::Rejected { status, body } => {
                    Outcome::Failure(classify_raw(status, body.as_deref()))
                }
            })
        })
        .catch_unwind()
        .await;

        let outcome = match attempt {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                warn!(call = %label, error = %err, "transport error");
                Outcome::Failure(ErrorKind::UnknownServerError)
            }
            Err(_) => {
                warn!(call = %label, "call panicked");
                Outcome::Failure(ErrorKind::UnknownServerError)
            }
        };

        log_outcome(&label, &outcome);
        outcome
    }

    /// Runs `call` when only success or failure matters.
    pub async fn execute_unit<C>(&self, call: C) -> Outcome<ErrorKind, ()>
    where
        C: RemoteCall,
    {
        self.execute(call, |_| ()).await
    }

    async fn await_response<C: RemoteCall>(
        &self,
        call: C,
    ) -> Result<TransportResponse<C::Body>, TransportError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call.execute())
                .await
                .map_err(|_| TransportError::Timeout)?,
            None => call.execute().await,
        }
    }
}

fn log_outcome<T>(label: &str, outcome: &Outcome<ErrorKind, T>) {
    match outcome {
        Outcome::Success(_) => debug!(call = %label, "call succeeded"),
        Outcome::Failure(kind) => warn!(call = %label, kind = kind.code(), "call failed"),
    }
}
