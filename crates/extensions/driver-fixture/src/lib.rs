//! # Glimpse Fixture Driver
//!
//! A [`PageDriver`](glimpse_protocols::PageDriver) backed by an in-memory
//! page model instead of a browser. Hover behaviour is scripted through
//! [`HoverEffect`]s, so menus, slow animations, hanging hovers and detached
//! elements can all be replayed deterministically.
//!
//! Models are plain JSON:
//!
//! ```json
//! {
//!   "viewport": { "x": 0, "y": 0, "width": 1280, "height": 720 },
//!   "elements": [
//!     { "id": 1, "tag": "html", "geometry": { "boundingBox": { "x": 0, "y": 0, "width": 1280, "height": 720 }, "isDisplayed": true, "opacity": 1.0, "overflowClipped": false } }
//!   ],
//!   "hoverEffects": []
//! }
//! ```

mod error;
mod model;
mod page;

pub use error::FixtureError;
pub use model::{FixtureElement, GeometryOverride, HoverEffect, PageModel};
pub use page::{FixturePage, PageEvent};
