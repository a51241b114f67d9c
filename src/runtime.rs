// SPDX-License-Identifier: MPL-2.0

//! Shared async runtime for the remote side of the transport.
//!
//! Hooks themselves never run async code; only controller tasks (such as the
//! loopback used by the demo) live here, off the UI thread.

use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::Runtime;

/// Two workers are plenty for message forwarding.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("chat-hooks-remote")
        .build()
        .expect("failed to create async runtime")
});

/// Spawn a future on the shared runtime without blocking.
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    RUNTIME.spawn(future)
}
