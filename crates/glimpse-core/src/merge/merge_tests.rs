use super::*;
use glimpse_config::SnapshotConfig;

use crate::dom::StableElementId;
use crate::tree::VisibilitySource;

fn id(s: &str) -> StableElementId {
    StableElementId::parse(s).unwrap()
}

fn node(path: &str, position: usize, text: Option<&str>) -> ElementNode {
    let id = id(path);
    let tag = id.tag().unwrap().to_string();
    let mut n = ElementNode::new(id, tag);
    n.sibling_position = position;
    n.text_content = text.map(str::to_string);
    n
}

fn with_children(mut parent: ElementNode, children: Vec<ElementNode>) -> ElementNode {
    parent.children = children;
    parent
}

/// html > body > (nav > li "Products", p "Welcome to the shop", section > span "Footer text")
fn base() -> ElementNode {
    with_children(
        node("/html[0]", 0, None),
        vec![with_children(
            node("/html[0]/body[0]", 1, None),
            vec![
                with_children(
                    node("/html[0]/body[0]/nav[0]", 0, None),
                    vec![node("/html[0]/body[0]/nav[0]/li[0]", 0, Some("Products"))],
                ),
                node("/html[0]/body[0]/p[0]", 2, Some("Welcome to the shop")),
                with_children(
                    node("/html[0]/body[0]/section[0]", 3, None),
                    vec![node("/html[0]/body[0]/section[0]/span[0]", 0, Some("Footer text"))],
                ),
            ],
        )],
    )
}

fn dropdown_delta() -> HoverDelta {
    HoverDelta {
        trigger: id("/html[0]/body[0]/nav[0]/li[0]"),
        nodes: vec![with_children(
            node("/html[0]/body[0]/nav[0]/li[0]/ul[0]", 0, None),
            vec![
                node("/html[0]/body[0]/nav[0]/li[0]/ul[0]/a[0]", 0, Some("Laptops")),
                node("/html[0]/body[0]/nav[0]/li[0]/ul[0]/a[1]", 1, Some("Phones")),
            ],
        )],
    }
}

fn tooltip_delta() -> HoverDelta {
    HoverDelta {
        trigger: id("/html[0]/body[0]/p[0]"),
        nodes: vec![node("/html[0]/body[0]/div[0]", 1, Some("A tooltip about the shop"))],
    }
}

#[test]
fn test_merge_attaches_under_parent() {
    let config = SnapshotConfig::default();
    let merger = SnapshotMerger::new(&config);
    let root = merger.merge(base(), vec![dropdown_delta()]).into_tree();

    let ul = root.find(&id("/html[0]/body[0]/nav[0]/li[0]/ul[0]")).unwrap();
    assert_eq!(ul.visibility_source, VisibilitySource::HoverRevealed);
    assert_eq!(ul.revealed_by, Some(id("/html[0]/body[0]/nav[0]/li[0]")));
    assert_eq!(ul.children.len(), 2);
    assert!(ul.children.iter().all(|c| c.is_hover_revealed()));

    let li = root.find(&id("/html[0]/body[0]/nav[0]/li[0]")).unwrap();
    assert_eq!(li.visibility_source, VisibilitySource::Base);
    assert_eq!(li.children[0].tag, "ul");
}

#[test]
fn test_merge_orders_by_sibling_position() {
    let config = SnapshotConfig::default();
    let merger = SnapshotMerger::new(&config);
    let root = merger.merge(base(), vec![tooltip_delta()]).into_tree();

    let body = &root.children[0];
    let tags: Vec<&str> = body.children.iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(tags, vec!["nav", "div", "p", "section"]);
}

#[test]
fn test_base_wins_over_hover() {
    let config = SnapshotConfig::default();
    let merger = SnapshotMerger::new(&config);
    let delta = HoverDelta {
        trigger: id("/html[0]/body[0]/nav[0]/li[0]"),
        nodes: vec![with_children(
            node("/html[0]/body[0]/p[0]", 2, Some("Welcome to the shop")),
            vec![node("/html[0]/body[0]/p[0]/b[0]", 0, Some("shop"))],
        )],
    };
    let root = merger.merge(base(), vec![delta]).into_tree();

    let p = root.find(&id("/html[0]/body[0]/p[0]")).unwrap();
    assert_eq!(p.visibility_source, VisibilitySource::Base);
    assert!(p.revealed_by.is_none());
    assert!(p.children[0].is_hover_revealed());
    assert_eq!(root.iter().filter(|n| n.id == id("/html[0]/body[0]/p[0]")).count(), 1);
}

#[test]
fn test_first_trigger_wins() {
    let config = SnapshotConfig::default();
    let merger = SnapshotMerger::new(&config);
    let mut second = dropdown_delta();
    second.trigger = id("/html[0]/body[0]/nav[0]");

    let tree = merger.merge(base(), vec![dropdown_delta(), second]);
    assert_eq!(tree.hover_subtree_count(), 1);
    let root = tree.into_tree();
    let ul = root.find(&id("/html[0]/body[0]/nav[0]/li[0]/ul[0]")).unwrap();
    assert_eq!(ul.revealed_by, Some(id("/html[0]/body[0]/nav[0]/li[0]")));
}

#[test]
fn test_missing_parent_synthesized() {
    let config = SnapshotConfig::default();
    let merger = SnapshotMerger::new(&config);
    let delta = HoverDelta {
        trigger: id("/html[0]/body[0]/nav[0]/li[0]"),
        nodes: vec![node("/html[0]/body[0]/aside[0]/div[2]/a[0]", 0, Some("Deep"))],
    };
    let tree = merger.merge(base(), vec![delta]);
    assert!(tree.contains(&id("/html[0]/body[0]/aside[0]")));
    let root = tree.into_tree();

    let aside = root.find(&id("/html[0]/body[0]/aside[0]")).unwrap();
    assert_eq!(aside.tag, "aside");
    assert!(aside.is_hover_revealed());
    assert_eq!(aside.revealed_by, Some(id("/html[0]/body[0]/nav[0]/li[0]")));
    assert!(aside.attributes.is_empty());
    assert_eq!(aside.children[0].tag, "div");
    assert_eq!(aside.children[0].children[0].text_content.as_deref(), Some("Deep"));
}

#[test]
fn test_finish_within_budget() {
    let config = SnapshotConfig::default();
    let merger = SnapshotMerger::new(&config);
    let tree = merger.merge(base(), vec![dropdown_delta()]);

    let (snapshot, payload, outcome) = merger.finish(tree, Viewport::default(), false).unwrap();
    assert!(!snapshot.truncated);
    assert!(!outcome.truncated);
    assert_eq!(outcome.size, payload.len());
    assert_eq!(payload, merger.serializer().to_json(&snapshot).unwrap());
}

fn payload_len(deltas: Vec<HoverDelta>) -> usize {
    let config = SnapshotConfig::default();
    let merger = SnapshotMerger::new(&config);
    let tree = merger.merge(base(), deltas);
    merger.finish(tree, Viewport::default(), true).unwrap().1.len()
}

#[test]
fn test_budget_drops_latest_hover_first() {
    let full = payload_len(vec![dropdown_delta(), tooltip_delta()]);
    let config = SnapshotConfig {
        max_payload_bytes: full - 1,
        ..Default::default()
    };
    let merger = SnapshotMerger::new(&config);
    let tree = merger.merge(base(), vec![dropdown_delta(), tooltip_delta()]);

    let (snapshot, payload, outcome) = merger.finish(tree, Viewport::default(), false).unwrap();
    assert!(snapshot.truncated);
    assert_eq!(outcome.hover_subtrees_dropped, 1);
    assert_eq!(outcome.texts_cleared, 0);
    assert!(snapshot.root.find(&id("/html[0]/body[0]/div[0]")).is_none());
    assert!(snapshot.root.find(&id("/html[0]/body[0]/nav[0]/li[0]/ul[0]")).is_some());
    assert_eq!(outcome.size, payload.len());
    assert!(payload.len() <= config.max_payload_bytes);
}

#[test]
fn test_budget_clears_text_from_the_bottom() {
    let bare = payload_len(vec![]);
    let config = SnapshotConfig {
        max_payload_bytes: bare - 1,
        ..Default::default()
    };
    let merger = SnapshotMerger::new(&config);
    let tree = merger.merge(base(), vec![dropdown_delta()]);

    let (snapshot, payload, outcome) = merger.finish(tree, Viewport::default(), false).unwrap();
    assert!(snapshot.truncated);
    assert_eq!(outcome.hover_subtrees_dropped, 1);
    assert_eq!(outcome.texts_cleared, 1);
    let span = snapshot.root.find(&id("/html[0]/body[0]/section[0]/span[0]")).unwrap();
    assert!(span.text_content.is_none());
    let p = snapshot.root.find(&id("/html[0]/body[0]/p[0]")).unwrap();
    assert!(p.text_content.is_some());
    assert_eq!(outcome.size, payload.len());
    assert!(payload.len() <= config.max_payload_bytes);
}

#[test]
fn test_overflow_when_nothing_left_to_drop() {
    let config = SnapshotConfig {
        max_payload_bytes: 100,
        ..Default::default()
    };
    let merger = SnapshotMerger::new(&config);
    let tree = merger.merge(base(), vec![dropdown_delta()]);

    let err = merger.finish(tree, Viewport::default(), false).unwrap_err();
    assert!(matches!(err, SnapshotError::SerializationOverflow { cap: 100, .. }));
}

#[test]
fn test_hard_cap_allows_over_budget_result() {
    let bare = payload_len(vec![]);
    let config = SnapshotConfig {
        max_payload_bytes: 100,
        hard_cap_bytes: Some(bare + 1000),
        ..Default::default()
    };
    let merger = SnapshotMerger::new(&config);
    let tree = merger.merge(base(), vec![dropdown_delta()]);

    let (snapshot, payload, outcome) = merger.finish(tree, Viewport::default(), false).unwrap();
    assert!(snapshot.truncated);
    assert!(payload.len() > 100);
    assert_eq!(outcome.size, payload.len());
}
