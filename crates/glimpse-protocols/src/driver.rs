//! Page driver trait definition.

use async_trait::async_trait;

use crate::error::DriverError;
use crate::types::{DomElement, ElementGeometry, ElementHandle, Viewport};

/// Narrow capability interface over a live rendered document.
///
/// A driver is borrowed exclusively for the duration of one snapshot pass.
/// Opening and closing the underlying browser session is the caller's job.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Read the current viewport rectangle (page-relative device pixels).
    async fn viewport(&self) -> Result<Viewport, DriverError>;

    /// Enumerate all elements of the document in document order.
    ///
    /// Every element's parent must appear before the element itself. Handles
    /// returned for the same live element must stay equal across calls within
    /// a pass.
    async fn enumerate(&self) -> Result<Vec<DomElement>, DriverError>;

    /// Read layout-dependent geometry for one element.
    ///
    /// Returns [`DriverError::StaleElement`] when the element is detached.
    async fn read_geometry(&self, handle: &ElementHandle) -> Result<ElementGeometry, DriverError>;

    /// Read geometry for many elements at once.
    ///
    /// The result has one entry per handle, in order. Backends that can batch
    /// round-trips should override this.
    async fn read_geometry_batch(
        &self,
        handles: &[ElementHandle],
    ) -> Result<Vec<Result<ElementGeometry, DriverError>>, DriverError> {
        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(self.read_geometry(handle).await);
        }
        Ok(out)
    }

    /// Move the pointer over the element.
    async fn hover(&self, handle: &ElementHandle) -> Result<(), DriverError>;

    /// Move the pointer away from whatever it hovers, undoing [`hover`](Self::hover).
    async fn move_away(&self) -> Result<(), DriverError>;
}
