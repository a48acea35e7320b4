//! Page fixtures shared by unit tests.

use glimpse_config::{HoverConfig, SnapshotConfig};
use glimpse_driver_fixture::{FixtureElement, FixturePage, HoverEffect, PageModel};
use glimpse_protocols::{BoundingBox, ElementGeometry, Viewport};

pub fn shown(x: f64, y: f64, w: f64, h: f64) -> ElementGeometry {
    ElementGeometry::displayed(BoundingBox::new(x, y, w, h))
}

pub fn viewport() -> Viewport {
    Viewport::new(0, 0, 800, 600)
}

/// `html > body > (nav > li "Products" > ul[hidden] > a "Laptops", p "Welcome", div[below fold])`
pub fn nav_model() -> PageModel {
    PageModel::new(viewport())
        .element(FixtureElement::new(1, None, "html", shown(0.0, 0.0, 800.0, 1600.0)))
        .element(FixtureElement::new(2, Some(1), "body", shown(0.0, 0.0, 800.0, 1600.0)))
        .element(FixtureElement::new(3, Some(2), "nav", shown(0.0, 0.0, 800.0, 40.0)))
        .element(
            FixtureElement::new(4, Some(3), "li", shown(10.0, 10.0, 100.0, 20.0))
                .text("Products")
                .attr("class", "menu"),
        )
        .element(FixtureElement::new(5, Some(4), "ul", ElementGeometry::hidden()))
        .element(
            FixtureElement::new(6, Some(5), "a", ElementGeometry::hidden())
                .text("Laptops")
                .attr("href", "/laptops"),
        )
        .element(FixtureElement::new(7, Some(2), "p", shown(10.0, 60.0, 300.0, 20.0)).text("Welcome"))
        .element(
            FixtureElement::new(8, Some(2), "div", shown(0.0, 900.0, 800.0, 100.0)).text("Footer"),
        )
        .hover_effect(
            HoverEffect::new(4)
                .reveal(5, shown(10.0, 30.0, 120.0, 40.0))
                .reveal(6, shown(10.0, 30.0, 120.0, 20.0)),
        )
}

pub fn nav_page() -> FixturePage {
    FixturePage::new(nav_model())
}

pub fn fast_snapshot_config() -> SnapshotConfig {
    SnapshotConfig {
        hover_probe_timeout_ms: 500,
        settle_poll_ms: 5,
        settle_max_ms: 100,
        restore_timeout_ms: 100,
        ..Default::default()
    }
}

pub fn hover_config() -> HoverConfig {
    HoverConfig::default()
}
