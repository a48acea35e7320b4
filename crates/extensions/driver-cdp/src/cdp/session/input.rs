//! Mouse input for CDP page session.

use serde_json::json;
use tracing::trace;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::MouseEventType;

use super::core::PageSession;

impl PageSession {
    /// Move the mouse to viewport coordinates (CSS pixels).
    pub async fn mouse_move(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
            })),
        )
        .await?;

        trace!("Mouse moved to ({}, {})", x, y);
        Ok(())
    }
}
