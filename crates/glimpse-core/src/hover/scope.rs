//! Pointer hover with guaranteed release.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use glimpse_protocols::{ElementHandle, PageDriver};

use crate::error::SnapshotError;

/// Result of work done while hovering.
pub(crate) struct ScopeOutcome<T> {
    pub result: Result<T, SnapshotError>,
    /// The pointer was moved away successfully.
    pub restored: bool,
}

/// Hover `handle`, run `body`, then move the pointer away.
///
/// Hovering and `body` share `limit`; when it runs out the work is dropped
/// and `on_timeout` is returned. Moving away happens on every path, bounded
/// by `restore_timeout`.
pub(crate) async fn while_hovered<D, F, Fut, T>(
    driver: &D,
    handle: ElementHandle,
    limit: Duration,
    restore_timeout: Duration,
    on_timeout: SnapshotError,
    body: F,
) -> ScopeOutcome<T>
where
    D: PageDriver + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, SnapshotError>>,
{
    let work = async {
        driver.hover(&handle).await?;
        body().await
    };

    let result = match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout),
    };

    let restored = match tokio::time::timeout(restore_timeout, driver.move_away()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Failed to move pointer away from {}: {}", handle, e);
            false
        }
        Err(_) => {
            warn!(
                "Moving pointer away from {} timed out after {}ms",
                handle,
                restore_timeout.as_millis()
            );
            false
        }
    };

    ScopeOutcome { result, restored }
}
