//! Blocking-task and deadline helpers.
//!
//! libgit2 calls block, so every backend-heavy step runs on tokio's blocking
//! pool. Each task receives its own clone of the query's cancellation token
//! and is expected to poll it between files or commits.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{ChurnError, Result};

/// Run `f` on the blocking pool. Fails fast if `cancel` already fired.
pub async fn run_blocking<T, F>(cancel: &CancellationToken, f: F) -> Result<T>
where
    F: FnOnce(CancellationToken) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let token = cancel.clone();
    tokio::task::spawn_blocking(move || {
        if token.is_cancelled() {
            return Err(ChurnError::Cancelled);
        }
        f(token)
    })
    .await
    .map_err(|e| ChurnError::TaskFailed(e.to_string()))?
}

/// Await `fut` until it finishes, `cancel` fires, or `timeout` elapses.
/// An elapsed deadline cancels `cancel` so blocking tasks wind down too.
pub async fn with_deadline<T, F>(
    timeout: Option<Duration>,
    cancel: &CancellationToken,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let guarded = async {
        tokio::select! {
            result = fut => result,
            _ = cancel.cancelled() => Err(ChurnError::Cancelled),
        }
    };

    let Some(limit) = timeout else {
        return guarded.await;
    };

    match tokio::time::timeout(limit, guarded).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Query exceeded its deadline of {:?}, cancelling", limit);
            cancel.cancel();
            Err(ChurnError::TimedOut(limit))
        }
    }
}

/// Bail out with `Cancelled` if the token fired.
pub fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(ChurnError::Cancelled)
    } else {
        Ok(())
    }
}
