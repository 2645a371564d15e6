use super::*;
use crate::page::{ComputedStyle, Rect};

fn setup() -> (PageDom, ElementRegistry, ContextConfig) {
    (
        PageDom::new(ViewportInfo::default()),
        ElementRegistry::new(),
        ContextConfig::default(),
    )
}

fn on_screen(dom: &mut PageDom, parent: NodeId, tag: &str) -> NodeId {
    let el = dom.append_element(parent, tag);
    dom.set_rect(el, Rect::new(10.0, 10.0, 50.0, 20.0));
    el
}

#[test]
fn test_button_line_content() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let button = on_screen(&mut dom, body, "button");
    dom.set_attr(button, "id", "go");
    dom.append_text(button, "Go");

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert_eq!(snapshot.element_count, 1);
    let line = snapshot.tree.lines().next().unwrap();
    assert!(line.contains("button"));
    assert!(line.contains("\"Go\""));
    assert!(line.contains("[e1]"));
    assert!(line.contains("id=go"));
}

#[test]
fn test_idempotent_reference_ids() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let button = on_screen(&mut dom, body, "button");
    dom.append_text(button, "Go");
    on_screen(&mut dom, body, "a");

    let first = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    let second = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert_eq!(first.tree, second.tree);
}

#[test]
fn test_no_duplicate_ids_in_one_pass() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    for _ in 0..5 {
        let b = on_screen(&mut dom, body, "button");
        dom.append_text(b, "Click");
    }

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    let mut refs: Vec<&str> = snapshot
        .tree
        .lines()
        .filter_map(|l| l.split('[').nth(1))
        .filter_map(|r| r.split(']').next())
        .collect();
    let total = refs.len();
    refs.sort();
    refs.dedup();
    assert_eq!(refs.len(), total);
    assert_eq!(total, 5);
}

#[test]
fn test_display_none_pruned() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let hidden = on_screen(&mut dom, body, "button");
    dom.append_text(hidden, "Hidden");
    dom.set_style(hidden, ComputedStyle::display_none());

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert!(!snapshot.tree.contains("Hidden"));
    assert_eq!(snapshot.element_count, 0);
}

#[test]
fn test_zero_size_excluded() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let empty = dom.append_element(body, "button");
    dom.append_text(empty, "Empty");
    // Default rect is zero width and height.

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert!(!snapshot.tree.contains("Empty"));
}

#[test]
fn test_offscreen_excluded_by_default_included_under_all() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let far = dom.append_element(body, "button");
    dom.set_rect(far, Rect::new(0.0, 5000.0, 50.0, 20.0));
    dom.append_text(far, "Far away");

    let default = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert!(!default.tree.contains("Far away"));

    let all = serialize(&dom, &mut registry, FilterMode::All, &cfg);
    assert!(all.tree.contains("Far away"));
}

#[test]
fn test_offscreen_parent_does_not_orphan_visible_child() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let wrapper = dom.append_element(body, "div");
    dom.set_rect(wrapper, Rect::new(0.0, 5000.0, 500.0, 500.0));
    let button = on_screen(&mut dom, wrapper, "button");
    dom.append_text(button, "Reachable");

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert!(snapshot.tree.contains("Reachable"));
}

#[test]
fn test_interactive_filter_drops_headings() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let heading = on_screen(&mut dom, body, "h1");
    dom.append_text(heading, "Welcome");
    let button = on_screen(&mut dom, body, "button");
    dom.append_text(button, "Go");

    let interactive = serialize(&dom, &mut registry, FilterMode::Interactive, &cfg);
    assert!(!interactive.tree.contains("Welcome"));
    assert!(interactive.tree.contains("Go"));

    let default = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert!(default.tree.contains("Welcome"));
}

#[test]
fn test_skip_tags_pruned() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let script = on_screen(&mut dom, body, "script");
    dom.append_text(script, "alert(1)");
    let aria_hidden = on_screen(&mut dom, body, "button");
    dom.set_attr(aria_hidden, "aria-hidden", "true");
    dom.append_text(aria_hidden, "Offstage");

    let snapshot = serialize(&dom, &mut registry, FilterMode::All, &cfg);
    assert!(!snapshot.tree.contains("alert"));
    assert!(!snapshot.tree.contains("Offstage"));
}

#[test]
fn test_depth_bound_halts() {
    let (mut dom, mut registry, cfg) = setup();
    let mut parent = dom.body();
    for i in 0..220 {
        let div = dom.append_element(parent, "div");
        dom.set_rect(div, Rect::new(0.0, 0.0, 100.0, 100.0));
        dom.set_attr(div, "role", "group");
        dom.set_attr(div, "id", &format!("level{}", i));
        parent = div;
    }

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    // Body occupies depth 0, so max_depth - 1 nested levels survive.
    assert_eq!(snapshot.element_count, cfg.max_depth - 1);
    assert!(snapshot.tree.contains("id=level13"));
    assert!(!snapshot.tree.contains("id=level14"));
}

#[test]
fn test_excluded_wrapper_adds_no_indentation() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let wrapper = dom.append_element(body, "div");
    dom.set_rect(wrapper, Rect::new(0.0, 0.0, 500.0, 500.0));
    let button = on_screen(&mut dom, wrapper, "button");
    dom.append_text(button, "Go");

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    let line = snapshot
        .tree
        .lines()
        .find(|l| l.contains("\"Go\""))
        .unwrap();
    // Body is not included either, so the button sits at zero indentation.
    assert!(!line.starts_with(' '));
}

#[test]
fn test_generic_unnamed_lines_dropped() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let noise = dom.append_element(body, "div");
    dom.set_rect(noise, Rect::new(0.0, 0.0, 100.0, 100.0));
    let button = on_screen(&mut dom, body, "button");
    dom.append_text(button, "Go");

    let snapshot = serialize(&dom, &mut registry, FilterMode::All, &cfg);
    for line in snapshot.tree.lines() {
        assert!(!line.trim_start().starts_with("generic"));
    }
    assert!(snapshot.tree.contains("\"Go\""));
}

#[test]
fn test_empty_body_yields_empty_tree() {
    let (dom, mut registry, cfg) = setup();
    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    assert_eq!(snapshot.tree, "");
    assert_eq!(snapshot.element_count, 0);
}

#[test]
fn test_long_name_truncated_in_line() {
    let (mut dom, mut registry, cfg) = setup();
    let body = dom.body();
    let button = on_screen(&mut dom, body, "button");
    dom.append_text(button, &"a".repeat(300));

    let snapshot = serialize(&dom, &mut registry, FilterMode::Default, &cfg);
    let line = snapshot.tree.lines().next().unwrap();
    let quoted = line.split('"').nth(1).unwrap();
    assert!(quoted.chars().count() <= cfg.name_cap);
}

#[test]
fn test_filter_mode_parse() {
    assert_eq!(FilterMode::parse(Some("interactive")), FilterMode::Interactive);
    assert_eq!(FilterMode::parse(Some("all")), FilterMode::All);
    assert_eq!(FilterMode::parse(Some("bogus")), FilterMode::Default);
    assert_eq!(FilterMode::parse(None), FilterMode::Default);
}
