use super::*;
use std::collections::HashSet;
use std::time::Duration;

use glimpse_config::{HoverConfig, HoverCriterion, SnapshotConfig};
use glimpse_driver_fixture::{FixtureElement, FixturePage, HoverEffect, PageEvent, PageModel};
use glimpse_protocols::{DomElement, ElementGeometry, ElementHandle};
use tokio::time::Instant;

use crate::dom::StableElementId;
use crate::sampler::{GeometrySampler, Sample};
use crate::test_support::{fast_snapshot_config, hover_config, nav_model, nav_page, shown, viewport};
use crate::tree::TreeBuilder;
use crate::visibility::{Classification, VisibilityClassifier};

struct Base {
    sample: Sample,
    classification: Classification,
    visible_ids: HashSet<StableElementId>,
    tree_ids: HashSet<StableElementId>,
}

async fn base_of(page: &FixturePage, config: &SnapshotConfig) -> Base {
    let sample = GeometrySampler::new(64).sample(page, None).await.unwrap();
    let classification = VisibilityClassifier::default().classify(&sample, &viewport());
    let visible_ids = classification.visible_ids(&sample);
    let tree = TreeBuilder::new(config)
        .build(&sample.index, &classification.visible)
        .unwrap();
    let tree_ids = tree.iter().map(|n| n.id.clone()).collect();
    Base {
        sample,
        classification,
        visible_ids,
        tree_ids,
    }
}

fn view(base: &Base) -> BaseView<'_> {
    BaseView {
        viewport: viewport(),
        visible_ids: &base.visible_ids,
        tree_ids: &base.tree_ids,
    }
}

fn far_deadline() -> Instant {
    Instant::now() + Duration::from_secs(30)
}

fn el(tag: &str) -> DomElement {
    DomElement::new(ElementHandle::new(1), None, tag)
}

#[test]
fn test_matches_rules() {
    let config = hover_config();
    let selector = CandidateSelector::new(&config, 10);

    assert_eq!(selector.matches(&el("a")), Some(CandidateReason::Tag));
    assert_eq!(selector.matches(&el("div").with_attribute("role", "menuitem")), Some(CandidateReason::Role));
    assert_eq!(selector.matches(&el("span").with_cursor("pointer")), Some(CandidateReason::Cursor));
    assert_eq!(
        selector.matches(&el("span").with_attribute("aria-haspopup", "true")),
        Some(CandidateReason::PopupAttribute)
    );
    assert_eq!(selector.matches(&el("span").with_attribute("aria-haspopup", "false")), None);
    assert_eq!(selector.matches(&el("span").with_attribute("title", "More info")), Some(CandidateReason::PopupAttribute));
    assert_eq!(selector.matches(&el("div")), None);
}

#[test]
fn test_matches_criteria() {
    let config = HoverConfig {
        criteria: vec![HoverCriterion {
            tag: Some("div".to_string()),
            class: Some("dropdown".to_string()),
            text: Some("More".to_string()),
            ..Default::default()
        }],
        ..hover_config()
    };
    let selector = CandidateSelector::new(&config, 10);

    let hit = el("div").with_attribute("class", "nav dropdown").with_text("  More  items ");
    assert_eq!(selector.matches(&hit), Some(CandidateReason::Criterion));

    let wrong_class = el("div").with_attribute("class", "dropdown-menu").with_text("More");
    assert_eq!(selector.matches(&wrong_class), None);

    let by_id = HoverConfig {
        criteria: vec![HoverCriterion {
            id: Some("account".to_string()),
            ..Default::default()
        }],
        ..hover_config()
    };
    let selector = CandidateSelector::new(&by_id, 10);
    assert_eq!(
        selector.matches(&el("span").with_attribute("id", "account")),
        Some(CandidateReason::Criterion)
    );
}

#[tokio::test]
async fn test_select_visible_in_document_order() {
    let page = nav_page();
    let config = fast_snapshot_config();
    let base = base_of(&page, &config).await;
    let hover = hover_config();

    let selection = CandidateSelector::new(&hover, 10).select(&base.sample, &base.classification);
    let ids: Vec<&str> = selection.candidates.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["/html[0]/body[0]/nav[0]", "/html[0]/body[0]/nav[0]/li[0]"]);
    assert_eq!(selection.over_limit, 0);
}

#[tokio::test]
async fn test_select_respects_limit_and_min_size() {
    let model = PageModel::new(viewport())
        .element(FixtureElement::new(1, None, "html", shown(0.0, 0.0, 800.0, 600.0)))
        .element(FixtureElement::new(2, Some(1), "a", shown(0.0, 0.0, 100.0, 20.0)))
        .element(FixtureElement::new(3, Some(1), "a", shown(0.0, 30.0, 5.0, 5.0)))
        .element(FixtureElement::new(4, Some(1), "a", shown(0.0, 60.0, 100.0, 20.0)))
        .element(FixtureElement::new(5, Some(1), "a", shown(0.0, 90.0, 100.0, 20.0)));
    let page = FixturePage::new(model);
    let config = fast_snapshot_config();
    let base = base_of(&page, &config).await;
    let hover = hover_config();

    let selection = CandidateSelector::new(&hover, 2).select(&base.sample, &base.classification);
    let handles: Vec<u64> = selection.candidates.iter().map(|c| c.handle.raw()).collect();
    assert_eq!(handles, vec![2, 4]);
    assert_eq!(selection.over_limit, 1);
}

#[tokio::test]
async fn test_select_disabled() {
    let page = nav_page();
    let config = fast_snapshot_config();
    let base = base_of(&page, &config).await;
    let hover = HoverConfig {
        enabled: false,
        ..hover_config()
    };
    let selection = CandidateSelector::new(&hover, 10).select(&base.sample, &base.classification);
    assert!(selection.candidates.is_empty());
}

async fn probe_page(page: &FixturePage, config: &SnapshotConfig, deadline: Instant) -> ProbeRun {
    let base = base_of(page, config).await;
    let hover = hover_config();
    let selection = CandidateSelector::new(&hover, 25).select(&base.sample, &base.classification);
    HoverProber::new(config)
        .probe_all(page, &selection.candidates, &view(&base), deadline)
        .await
}

#[tokio::test]
async fn test_probe_reveals_dropdown() {
    let page = nav_page();
    let config = fast_snapshot_config();
    let run = probe_page(&page, &config, far_deadline()).await;

    assert_eq!(run.stats.run, 2);
    assert_eq!(run.stats.empty, 1);
    assert_eq!(run.deltas.len(), 1);

    let delta = &run.deltas[0];
    assert_eq!(delta.trigger.as_str(), "/html[0]/body[0]/nav[0]/li[0]");
    assert_eq!(delta.nodes.len(), 1);
    assert_eq!(delta.nodes[0].id.as_str(), "/html[0]/body[0]/nav[0]/li[0]/ul[0]");
    assert_eq!(delta.nodes[0].children[0].text_content.as_deref(), Some("Laptops"));
    assert_eq!(delta.node_count(), 2);
}

#[tokio::test]
async fn test_every_hover_is_followed_by_move_away() {
    let page = nav_page();
    let config = fast_snapshot_config();
    probe_page(&page, &config, far_deadline()).await;

    let events = page.events();
    assert_eq!(events.len(), 4);
    for pair in events.chunks(2) {
        assert!(matches!(pair[0], PageEvent::Hover(_)));
        assert_eq!(pair[1], PageEvent::MoveAway);
    }
    assert_eq!(page.hovered(), None);
}

#[tokio::test]
async fn test_hanging_hover_times_out_and_restores() {
    let model = nav_model().hover_effect(HoverEffect::new(3).hover_delay_ms(2_000));
    let page = FixturePage::new(model);
    let config = SnapshotConfig {
        hover_probe_timeout_ms: 50,
        ..fast_snapshot_config()
    };

    let run = probe_page(&page, &config, far_deadline()).await;
    assert_eq!(run.stats.timed_out, 1);
    assert_eq!(run.deltas.len(), 1);
    assert_eq!(page.events()[1], PageEvent::MoveAway);
}

#[tokio::test]
async fn test_failing_hover_is_skipped() {
    let model = nav_model().hover_effect(HoverEffect::new(3).failing());
    let page = FixturePage::new(model);
    let config = fast_snapshot_config();

    let run = probe_page(&page, &config, far_deadline()).await;
    assert_eq!(run.stats.failed, 1);
    assert_eq!(run.deltas.len(), 1);
    assert_eq!(page.events()[1], PageEvent::MoveAway);
}

#[tokio::test]
async fn test_expired_deadline_stops_probing() {
    let page = nav_page();
    let config = fast_snapshot_config();

    let run = probe_page(&page, &config, Instant::now()).await;
    assert!(run.stats.deadline_hit);
    assert_eq!(run.stats.run, 0);
    assert!(page.events().is_empty());
}

#[tokio::test]
async fn test_delayed_reveal_is_waited_for() {
    let model = PageModel::new(viewport())
        .element(FixtureElement::new(1, None, "html", shown(0.0, 0.0, 800.0, 600.0)))
        .element(FixtureElement::new(2, Some(1), "button", shown(0.0, 0.0, 100.0, 30.0)))
        .element(FixtureElement::new(3, Some(1), "div", ElementGeometry::hidden()).text("Tip"))
        .hover_effect(
            HoverEffect::new(2)
                .reveal(3, shown(0.0, 40.0, 100.0, 30.0))
                .reveal_after_ms(20),
        );
    let page = FixturePage::new(model);
    let config = SnapshotConfig {
        settle_poll_ms: 40,
        settle_max_ms: 400,
        ..fast_snapshot_config()
    };

    let run = probe_page(&page, &config, far_deadline()).await;
    assert_eq!(run.deltas.len(), 1);
    assert_eq!(run.deltas[0].nodes[0].text_content.as_deref(), Some("Tip"));
}

#[tokio::test]
async fn test_lingering_content_not_attributed_to_next_trigger() {
    let model = PageModel::new(viewport())
        .element(FixtureElement::new(1, None, "html", shown(0.0, 0.0, 800.0, 600.0)))
        .element(FixtureElement::new(2, Some(1), "button", shown(0.0, 0.0, 100.0, 30.0)))
        .element(FixtureElement::new(3, Some(1), "button", shown(0.0, 40.0, 100.0, 30.0)))
        .element(FixtureElement::new(4, Some(1), "div", ElementGeometry::hidden()).text("Sticky"))
        .hover_effect(HoverEffect::new(2).reveal(4, shown(200.0, 0.0, 100.0, 30.0)).sticky());
    let page = FixturePage::new(model);
    let config = fast_snapshot_config();

    let run = probe_page(&page, &config, far_deadline()).await;
    assert_eq!(run.deltas.len(), 1);
    assert_eq!(run.deltas[0].trigger.as_str(), "/html[0]/button[0]");
    assert_eq!(run.stats.lingering, 1);
    assert_eq!(run.stats.empty, 1);
}
