//! Runtime abstraction layer for async operations
//!
//! The library never spawns or blocks: every operation is a future awaited by
//! the caller's executor. The only runtime service it needs is a timer, which
//! is available with the `tokio-runtime` feature on native targets.

use crate::prelude::{Duration, Future};

/// Awaits `future`, giving up after `duration`.
///
/// Returns `None` on timeout. Without a usable timer (the browser, or no
/// tokio runtime entered) the future is awaited without a deadline.
pub async fn with_timeout<F>(duration: Duration, future: F) -> Option<F::Output>
where
    F: Future,
{
    #[cfg(all(feature = "tokio-runtime", not(target_arch = "wasm32")))]
    {
        if ::tokio::runtime::Handle::try_current().is_ok() {
            return ::tokio::time::timeout(duration, future).await.ok();
        }
    }

    log::debug!("No timer available, awaiting without a {:?} deadline", duration);
    Some(future.await)
}

/// Whether [`with_timeout`] enforces its deadline in the current context
pub fn has_timer() -> bool {
    #[cfg(all(feature = "tokio-runtime", not(target_arch = "wasm32")))]
    {
        ::tokio::runtime::Handle::try_current().is_ok()
    }
    #[cfg(not(all(feature = "tokio-runtime", not(target_arch = "wasm32"))))]
    {
        false
    }
}
