//! Sync-over-async bridge.
//!
//! Blocking calls spawn the same future the async API uses onto a
//! process-wide background runtime and park the caller until it resolves.
//! The runtime is created on first use and lives for the rest of the
//! process.
//!
//! The caller is parked with a plain executor rather than tokio's
//! `blocking_recv`, so `spawn_blocking` threads and `Runtime::enter` scopes
//! are valid callers. Calling from an async worker parks that worker until
//! the request finishes. Only the background runtime's own workers are
//! refused, since parking them can starve the request being waited on.

use crate::errors::{HttpClientError, HttpResult};
use once_cell::sync::OnceCell;
use std::cell::Cell;
use std::future::Future;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;
use tracing::debug;

static BACKGROUND: OnceCell<Runtime> = OnceCell::new();

thread_local! {
    static ON_BACKGROUND_THREAD: Cell<bool> = const { Cell::new(false) };
}

fn background_runtime() -> HttpResult<&'static Runtime> {
    BACKGROUND.get_or_try_init(|| {
        debug!("Starting background runtime for blocking requests");
        Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("http-client-blocking")
            .on_thread_start(|| ON_BACKGROUND_THREAD.with(|flag| flag.set(true)))
            .enable_all()
            .build()
            .map_err(|e| HttpClientError::runtime(format!("failed to start background runtime: {}", e)))
    })
}

/// Run `future` to completion on the background runtime, blocking the
/// calling thread.
///
/// Returns [`HttpClientError::Runtime`] when called from one of the
/// background runtime's own threads.
pub(crate) fn wait<F, T>(future: F) -> HttpResult<T>
where
    F: Future<Output = HttpResult<T>> + Send + 'static,
    T: Send + 'static,
{
    if ON_BACKGROUND_THREAD.with(Cell::get) {
        return Err(HttpClientError::runtime(
            "blocking call made from the background request runtime; use the async method instead",
        ));
    }
    if Handle::try_current().is_ok() {
        debug!("Parking a thread that holds a runtime context for a blocking request");
    }

    let runtime = background_runtime()?;
    let (tx, rx) = oneshot::channel();
    runtime.spawn(async move {
        let _ = tx.send(future.await);
    });

    futures::executor::block_on(rx)
        .map_err(|_| HttpClientError::runtime("background request task ended without a result"))?
}
