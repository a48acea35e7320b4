//! `PageDriver` over a CDP page session.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

use glimpse_protocols::{DomElement, DriverError, ElementGeometry, ElementHandle, PageDriver, Viewport};

use crate::cdp::PageSession;

const ENUMERATE_SCRIPT: &str = include_str!("scripts/enumerate.js");
const GEOMETRY_SCRIPT: &str = include_str!("scripts/geometry.js");
const VIEWPORT_SCRIPT: &str = include_str!("scripts/viewport.js");
const HOVER_POINT_SCRIPT: &str = include_str!("scripts/hover_point.js");
const LEAVE_SCRIPT: &str = include_str!("scripts/leave.js");

/// Pointer position used by [`PageDriver::move_away`]: just outside the page.
const AWAY_POINT: (f64, f64) = (-1.0, -1.0);

/// One entry of the geometry script's reply.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeometryReply {
    Found { geometry: ElementGeometry },
    Stale { stale: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoverPoint {
    x: f64,
    y: f64,
    in_view: bool,
}

/// Drives a live Chrome page.
///
/// Geometry is read for a whole batch in one `Runtime.evaluate` round-trip.
/// Hover uses real mouse events so CSS `:hover` rules apply.
pub struct CdpPageDriver {
    session: PageSession,
}

impl CdpPageDriver {
    pub fn new(session: PageSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    pub fn into_session(self) -> PageSession {
        self.session
    }
}

#[async_trait]
impl PageDriver for CdpPageDriver {
    async fn viewport(&self) -> Result<Viewport, DriverError> {
        let value = self.session.call_function(VIEWPORT_SCRIPT, &[]).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn enumerate(&self) -> Result<Vec<DomElement>, DriverError> {
        let value = self.session.call_function(ENUMERATE_SCRIPT, &[]).await?;
        let elements: Vec<DomElement> = serde_json::from_value(value)?;
        debug!("Enumerated {} elements", elements.len());
        Ok(elements)
    }

    async fn read_geometry(&self, handle: &ElementHandle) -> Result<ElementGeometry, DriverError> {
        self.read_geometry_batch(std::slice::from_ref(handle))
            .await?
            .pop()
            .ok_or_else(|| DriverError::InvalidResponse("empty geometry reply".to_string()))?
    }

    async fn read_geometry_batch(
        &self,
        handles: &[ElementHandle],
    ) -> Result<Vec<Result<ElementGeometry, DriverError>>, DriverError> {
        let raw: Vec<u64> = handles.iter().map(ElementHandle::raw).collect();
        let value = self
            .session
            .call_function(GEOMETRY_SCRIPT, &[json!(raw)])
            .await?;
        let results = parse_geometry_replies(value)?;
        if results.len() != handles.len() {
            return Err(DriverError::InvalidResponse(format!(
                "asked for {} geometries, got {}",
                handles.len(),
                results.len()
            )));
        }
        Ok(results)
    }

    async fn hover(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        let value = self
            .session
            .call_function(HOVER_POINT_SCRIPT, &[json!(handle.raw())])
            .await?;
        let (x, y) = parse_hover_point(handle, value)?;
        trace!("Hovering {} at ({}, {})", handle, x, y);
        self.session.mouse_move(x, y).await?;
        Ok(())
    }

    async fn move_away(&self) -> Result<(), DriverError> {
        let (x, y) = AWAY_POINT;
        self.session.mouse_move(x, y).await?;
        let synthesized = self.session.call_function(LEAVE_SCRIPT, &[]).await?;
        if synthesized.as_bool() == Some(true) {
            debug!("Pointer left the page but hover stuck, dispatched leave events");
        }
        Ok(())
    }
}

fn parse_geometry_replies(value: Value) -> Result<Vec<Result<ElementGeometry, DriverError>>, DriverError> {
    let replies: Vec<GeometryReply> = serde_json::from_value(value)?;
    Ok(replies
        .into_iter()
        .map(|reply| match reply {
            GeometryReply::Found { geometry } => Ok(geometry),
            GeometryReply::Stale { stale } => Err(DriverError::StaleElement(stale)),
        })
        .collect())
}

fn parse_hover_point(handle: &ElementHandle, value: Value) -> Result<(f64, f64), DriverError> {
    let point: Option<HoverPoint> = serde_json::from_value(value)?;
    match point {
        None => Err(DriverError::StaleElement(format!("element {} is detached", handle))),
        Some(p) if !p.in_view => Err(DriverError::Backend(format!(
            "element {} is outside the viewport",
            handle
        ))),
        Some(p) => Ok((p.x, p.y)),
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
