use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cancellable lifetime of one invocation, handed to the running operation.
///
/// Cancelling the scope cancels every child derived from it.
#[derive(Debug, Clone)]
pub struct InvocationScope {
    id: InvocationId,
    token: CancellationToken,
}

impl InvocationScope {
    pub(crate) const fn new(id: InvocationId, token: CancellationToken) -> Self {
        Self { id, token }
    }

    /// A scope that is never cancelled by anyone but its holder.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(InvocationId::new(), CancellationToken::new())
    }

    #[must_use]
    pub const fn id(&self) -> InvocationId {
        self.id
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Nested scope: cancelled with this one, but cancelling it leaves the parent alone.
    #[must_use]
    pub fn child(&self) -> Self {
        Self::new(self.id, self.token.child_token())
    }

    /// Drives `fut` until it finishes or the scope is cancelled, whichever is first.
    pub async fn guard<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            output = fut => Some(output),
        }
    }

    /// Spawns nested work on the current runtime under a child scope.
    pub fn spawn_child<F>(&self, fut: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let child = self.child();
        tokio::spawn(async move { child.guard(fut).await })
    }
}
