use super::*;

use std::time::Duration;

use glimpse_driver_fixture::{FixtureElement, FixturePage, HoverEffect, PageEvent, PageModel};

use crate::test_support::{fast_snapshot_config, hover_config, nav_model, nav_page, shown, viewport};

fn engine(snapshot: SnapshotConfig) -> SnapshotEngine {
    SnapshotEngine::new(snapshot, hover_config())
}

fn id(s: &str) -> StableElementId {
    StableElementId::parse(s).unwrap()
}

#[tokio::test]
async fn test_run_produces_base_and_hover_content() {
    let page = nav_page();
    let outcome = engine(fast_snapshot_config()).run(&page).await.unwrap();
    let root = &outcome.snapshot.root;

    assert_eq!(root.tag, "html");
    assert!(!outcome.snapshot.truncated);

    let p = root.find(&id("/html[0]/body[0]/p[0]")).unwrap();
    assert_eq!(p.visibility_source, crate::tree::VisibilitySource::Base);

    let link = root.find(&id("/html[0]/body[0]/nav[0]/li[0]/ul[0]/a[0]")).unwrap();
    assert!(link.is_hover_revealed());
    assert_eq!(link.revealed_by, Some(id("/html[0]/body[0]/nav[0]/li[0]")));
    assert_eq!(link.attributes.get("href").map(String::as_str), Some("/laptops"));

    assert!(root.find(&id("/html[0]/body[0]/div[0]")).is_none());
}

#[tokio::test]
async fn test_report_counts() {
    let page = nav_page();
    let outcome = engine(fast_snapshot_config()).run(&page).await.unwrap();
    let report = &outcome.report;

    assert_eq!(report.elements_sampled, 8);
    assert_eq!(report.visible_elements, 5);
    assert_eq!(report.hover_candidates, 2);
    assert_eq!(report.probes_run, 2);
    assert_eq!(report.probes_empty, 1);
    assert_eq!(report.deltas_merged, 1);
    assert_eq!(report.probes_skipped(), 0);
    assert!(!report.deadline_hit);
    assert_eq!(report.payload_bytes, outcome.payload.len());
}

#[tokio::test]
async fn test_payload_matches_snapshot() {
    let page = nav_page();
    let config = fast_snapshot_config();
    let outcome = engine(config.clone()).run(&page).await.unwrap();

    let reserialized = crate::serialize::SnapshotSerializer::new(config.emit_stable_ids)
        .to_json(&outcome.snapshot)
        .unwrap();
    assert_eq!(outcome.payload, reserialized);
}

#[tokio::test]
async fn test_pointer_released_after_pass() {
    let page = nav_page();
    engine(fast_snapshot_config()).run(&page).await.unwrap();
    assert_eq!(page.hovered(), None);
    assert_eq!(page.events().last(), Some(&PageEvent::MoveAway));
}

#[tokio::test]
async fn test_hover_disabled() {
    let page = nav_page();
    let mut hover = hover_config();
    hover.enabled = false;
    let outcome = SnapshotEngine::new(fast_snapshot_config(), hover)
        .run(&page)
        .await
        .unwrap();

    assert!(outcome.snapshot.root.iter().all(|n| !n.is_hover_revealed()));
    assert!(page.events().is_empty());
}

#[tokio::test]
async fn test_deadline_during_probe_truncates() {
    let page = FixturePage::new(nav_model().hover_effect(HoverEffect::new(3).hover_delay_ms(5_000)));
    let config = SnapshotConfig {
        pass_deadline_ms: 200,
        hover_probe_timeout_ms: 2_000,
        ..fast_snapshot_config()
    };
    let outcome = engine(config).run(&page).await.unwrap();

    assert!(outcome.snapshot.truncated);
    assert!(outcome.report.deadline_hit);
    assert_eq!(outcome.report.deltas_merged, 0);
    assert!(outcome.snapshot.root.find(&id("/html[0]/body[0]/p[0]")).is_some());
    assert_eq!(page.hovered(), None);
}

fn plain_model() -> PageModel {
    PageModel::new(viewport())
        .element(FixtureElement::new(1, None, "html", shown(0.0, 0.0, 800.0, 600.0)))
        .element(FixtureElement::new(2, Some(1), "body", shown(0.0, 0.0, 800.0, 600.0)))
        .element(FixtureElement::new(3, Some(2), "p", shown(10.0, 10.0, 200.0, 20.0)).text("Hello"))
}

#[tokio::test]
async fn test_slow_geometry_read_bounded_by_deadline() {
    let page = FixturePage::new(plain_model().geometry_delay_ms(2_000));
    let config = SnapshotConfig {
        pass_deadline_ms: 150,
        ..fast_snapshot_config()
    };

    let started = Instant::now();
    let outcome = engine(config).run(&page).await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(1_500));
    assert!(outcome.snapshot.truncated);
    assert!(outcome.report.deadline_hit);
    assert_eq!(outcome.report.hover_candidates, 0);
    assert_eq!(outcome.snapshot.root.tag, "html");
}

#[tokio::test]
async fn test_slow_enumeration_exceeds_deadline() {
    let page = FixturePage::new(plain_model().enumerate_delay_ms(2_000));
    let config = SnapshotConfig {
        pass_deadline_ms: 150,
        ..fast_snapshot_config()
    };

    let started = Instant::now();
    let err = engine(config).run(&page).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_millis(1_500));
    assert!(matches!(err, SnapshotError::PassDeadlineExceeded(150)));
}

#[tokio::test]
async fn test_failed_geometry_reads_reported() {
    let page = FixturePage::new(
        plain_model().element(FixtureElement::new(4, Some(2), "canvas", shown(0.0, 40.0, 50.0, 50.0)).broken()),
    );
    let outcome = engine(fast_snapshot_config()).run(&page).await.unwrap();

    assert_eq!(outcome.report.failed_elements, 1);
    assert_eq!(outcome.report.stale_elements, 0);
    assert!(outcome.snapshot.root.find(&id("/html[0]/body[0]/canvas[0]")).is_none());
    assert!(outcome.snapshot.root.find(&id("/html[0]/body[0]/p[0]")).is_some());
}

#[tokio::test]
async fn test_empty_document_is_an_error() {
    let page = FixturePage::new(PageModel::default());
    let err = engine(fast_snapshot_config()).run(&page).await.unwrap_err();
    assert!(matches!(err, SnapshotError::Driver(_)));
}

#[test]
fn test_from_config() {
    let mut config = Config::default();
    config.snapshot.max_hover_candidates = 3;
    config.hover.enabled = false;
    let engine = SnapshotEngine::from_config(&config);
    assert_eq!(engine.snapshot_config().max_hover_candidates, 3);
    assert!(!engine.hover_config().enabled);
}
