#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Restartable, cancellable unit of asynchronous work.
//!
//! Each `invoke` supersedes the previous one. A superseded or cancelled
//! invocation never reaches its callback; every other invocation reaches it
//! exactly once, on the foreground context.

pub mod context;
pub mod scope;


pub use context::{
    ExecutionContexts, ForegroundContext, ForegroundJob, ForegroundLoop, SerialDispatcher,
};
pub use scope::{InvocationId, InvocationScope};

use crate::config::{DispatchConfig, UnconsumedResultPolicy};
use crate::failure::ErrorKind;
use crate::outcome::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Fallible asynchronous work parameterised by `Params`.
///
/// Implementations report every failure through the returned outcome and should
/// hand `scope` (or children of it) to any nested work they start.
pub trait Operation: Send + Sync + 'static {
    type Params: Send + 'static;
    type Output: Send + 'static;

    fn run(
        &self,
        params: Self::Params,
        scope: InvocationScope,
    ) -> impl Future<Output = Outcome<ErrorKind, Self::Output>> + Send;
}

pub type ResultCallback<T> = Box<dyn FnOnce(Outcome<ErrorKind, T>) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationSnapshot {
    pub id: InvocationId,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug)]
enum InvocationSlot {
    Idle,
    Running {
        id: InvocationId,
        token: CancellationToken,
        started_at: DateTime<Utc>,
    },
}

enum Consumer<T> {
    Callback(ResultCallback<T>),
    Detached(UnconsumedResultPolicy),
}

impl<T> Consumer<T> {
    fn accept(self, id: InvocationId, result: Outcome<ErrorKind, T>) {
        match self {
            Self::Callback(callback) => callback(result),
            Self::Detached(UnconsumedResultPolicy::Log) => match &result {
                Outcome::Success(_) => {
                    debug!(invocation = %id, "Result completed with no consumer");
                }
                Outcome::Failure(kind) => {
                    warn!(invocation = %id, kind = kind.code(), "Failure completed with no consumer");
                }
            },
            Self::Detached(UnconsumedResultPolicy::Drop) => {}
        }
    }
}

pub struct CancellableUseCase<O> {
    operation: Arc<O>,
    contexts: ExecutionContexts,
    slot: Arc<Mutex<InvocationSlot>>,
    unconsumed: UnconsumedResultPolicy,
}

impl<O: Operation> CancellableUseCase<O> {
    pub fn new(operation: O, contexts: ExecutionContexts) -> Self {
        Self {
            operation: Arc::new(operation),
            contexts,
            slot: Arc::new(Mutex::new(InvocationSlot::Idle)),
            unconsumed: UnconsumedResultPolicy::default(),
        }
    }

    pub fn from_config(operation: O, contexts: ExecutionContexts, config: &DispatchConfig) -> Self {
        Self::new(operation, contexts).with_unconsumed_policy(config.unconsumed_results)
    }

    #[must_use]
    pub fn with_unconsumed_policy(mut self, policy: UnconsumedResultPolicy) -> Self {
        self.unconsumed = policy;
        self
    }

    /// Starts the operation, cancelling any invocation still in flight.
    ///
    /// `on_result` runs on the foreground context unless this invocation is
    /// superseded or cancelled first.
    pub fn invoke<C>(&self, params: O::Params, on_result: C) -> InvocationId
    where
        C: FnOnce(Outcome<ErrorKind, O::Output>) + Send + 'static,
    {
        self.start(params, Consumer::Callback(Box::new(on_result)))
    }

    /// Starts the operation with nobody waiting for the result.
    pub fn invoke_detached(&self, params: O::Params) -> InvocationId {
        self.start(params, Consumer::Detached(self.unconsumed))
    }

    fn start(&self, params: O::Params, consumer: Consumer<O::Output>) -> InvocationId {
        let id = InvocationId::new();
        let token = CancellationToken::new();

        let previous = std::mem::replace(
            &mut *lock_slot(&self.slot),
            InvocationSlot::Running {
                id,
                token: token.clone(),
                started_at: Utc::now(),
            },
        );
        if let InvocationSlot::Running {
            id: superseded,
            token: stale,
            ..
        } = previous
        {
            stale.cancel();
            debug!(invocation = %superseded, superseded_by = %id, "Superseded in-flight invocation");
        }

        let scope = InvocationScope::new(id, token);
        let operation = Arc::clone(&self.operation);
        let release = SlotRelease {
            slot: Arc::clone(&self.slot),
            id,
        };
        let foreground = Arc::clone(&self.contexts.foreground);

        debug!(invocation = %id, "Invocation started");
        self.contexts.background.spawn(async move {
            let Some(result) = scope.guard(operation.run(params, scope.clone())).await else {
                debug!(invocation = %id, "Invocation cancelled before completion");
                return;
            };
            foreground.dispatch(Box::new(move || deliver(&release, result, consumer)));
        });

        id
    }
}

impl<O> CancellableUseCase<O> {
    /// Cancels the in-flight invocation, if any. Its result will be discarded.
    pub fn cancel(&self) {
        let previous = std::mem::replace(&mut *lock_slot(&self.slot), InvocationSlot::Idle);
        if let InvocationSlot::Running { id, token, .. } = previous {
            token.cancel();
            debug!(invocation = %id, "Invocation cancelled");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(*lock_slot(&self.slot), InvocationSlot::Running { .. })
    }

    #[must_use]
    pub fn current_invocation(&self) -> Option<InvocationSnapshot> {
        match &*lock_slot(&self.slot) {
            InvocationSlot::Idle => None,
            InvocationSlot::Running { id, started_at, .. } => Some(InvocationSnapshot {
                id: *id,
                started_at: *started_at,
            }),
        }
    }
}

impl<O> Drop for CancellableUseCase<O> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Ownership of one invocation's claim on the slot.
///
/// Travels with the background task and then with the foreground job. If
/// either is dropped before delivery (the operation panicked, or the
/// foreground loop is gone) the slot still returns to `Idle`.
struct SlotRelease {
    slot: Arc<Mutex<InvocationSlot>>,
    id: InvocationId,
}

impl SlotRelease {
    /// Moves the slot to `Idle` if it still belongs to this invocation.
    fn commit(&self) -> bool {
        let mut current = lock_slot(&self.slot);
        let live = matches!(&*current, InvocationSlot::Running { id, .. } if *id == self.id);
        if live {
            *current = InvocationSlot::Idle;
        }
        live
    }
}

impl Drop for SlotRelease {
    fn drop(&mut self) {
        if self.commit() {
            debug!(invocation = %self.id, "Invocation ended without delivery; slot released");
        }
    }
}

/// Commits the result on the foreground context.
///
/// The slot comparison and the transition to `Idle` happen under one lock, so a
/// result whose invocation was replaced or cancelled in the meantime is dropped.
fn deliver<T>(release: &SlotRelease, result: Outcome<ErrorKind, T>, consumer: Consumer<T>) {
    let id = release.id;
    if release.commit() {
        debug!(invocation = %id, "Delivering result");
        consumer.accept(id, result);
    } else {
        debug!(invocation = %id, "Dropping stale result");
    }
}

fn lock_slot(slot: &Mutex<InvocationSlot>) -> MutexGuard<'_, InvocationSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
