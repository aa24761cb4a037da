mod common;

use snaphide::activation::machine::{Key, PageEvent, UiCommand};
use snaphide::coordinator::messages::{Message, MessageSender};
use snaphide::dom::dom_model::ElementData;
use snaphide::hiding::engine::{DELETED_ATTR, ID_ATTR};
use snaphide::hiding::stylesheet;

fn activate(host: &mut snaphide::coordinator::host::TabHost, tab: u32, now_ms: u64) {
    let response = host.dispatch(
        Message::ToggleSnapHide {
            active: true,
            tab_id: Some(tab),
            from_content_script: false,
        },
        MessageSender::none(),
        now_ms,
    );
    assert!(response.success, "activation toggle must land");
}

// ============================================================================
// The whole journey: snap, persist, reload, restore
// ============================================================================

#[test]
fn snap_persist_reload_restore() {
    let mut host = snaphide::open_host_in_memory();

    // --- First page load: the user snaps the ad banner ---
    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);

    host.page_event(1, PageEvent::MouseOver(banner), 10);
    let commands = host.page_event(1, PageEvent::Click(banner), 20);
    assert!(
        commands.contains(&UiCommand::PreventDefault),
        "the click never reaches the page"
    );
    assert!(commands.contains(&UiCommand::Snap { target: banner }));

    let records = host.background().store().list("example.com").expect("list");
    assert_eq!(records.len(), 1, "one record persisted for the hostname");
    assert_eq!(records[0].selector(), "#ad-banner");
    assert!(records[0].id.starts_with("element_"));
    let element_id = records[0].id.clone();

    let agent = host.agent(1).expect("agent");
    assert_eq!(agent.doc().element(banner).attr(ID_ATTR), Some(element_id.as_str()));
    assert_eq!(agent.doc().element(banner).attr(DELETED_ATTR), Some("true"));
    assert!(
        stylesheet::injected_css(agent.doc())
            .expect("stylesheet injected")
            .contains("#ad-banner")
    );

    // --- The user restores the element from the popup, same page load ---
    let response = host.dispatch(
        Message::RestoreElement {
            element_id: element_id.clone(),
            hostname: "example.com".to_string(),
        },
        MessageSender::none(),
        500,
    );
    assert!(response.success);
    assert_eq!(
        host.background().store().list("example.com").expect("list").len(),
        0,
        "the record is gone"
    );

    let agent = host.agent(1).expect("agent");
    assert_eq!(agent.doc().element(banner).attr(DELETED_ATTR), None);
    assert_eq!(agent.doc().element(banner).attr(ID_ATTR), None);
    assert!(agent.hidden_selectors().is_empty());
    assert!(stylesheet::injected_css(agent.doc()).is_none());

    // --- And the next page load stays clean ---
    host.close_page(1);
    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 1_000);
    let agent = host.agent(1).expect("agent after reload");
    assert_eq!(agent.doc().element(banner).attr(DELETED_ATTR), None);
    assert!(agent.hidden_selectors().is_empty());
}

#[test]
fn popup_restore_after_reload_takes_effect_on_the_next_load() {
    let mut host = snaphide::open_host_in_memory();

    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);
    host.page_event(1, PageEvent::MouseOver(banner), 10);
    host.page_event(1, PageEvent::Click(banner), 20);
    let element_id = host.background().store().list("example.com").expect("list")[0]
        .id
        .clone();

    // Reload: suppression is selector-driven now, the id marker is gone
    host.close_page(1);
    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 1_000);
    assert_eq!(
        host.agent(1).expect("agent").doc().element(banner).attr(DELETED_ATTR),
        Some("true")
    );

    let response = host.dispatch(
        Message::RestoreElement {
            element_id,
            hostname: "example.com".to_string(),
        },
        MessageSender::none(),
        2_000,
    );
    assert!(response.success);
    assert_eq!(
        host.background().store().list("example.com").expect("list").len(),
        0,
        "the record is deleted even though no live element carried the id"
    );

    // This page load keeps the element suppressed; the next one is clean
    host.close_page(1);
    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 3_000);
    let agent = host.agent(1).expect("agent");
    assert_eq!(agent.doc().element(banner).attr(DELETED_ATTR), None);
    assert!(agent.hidden_selectors().is_empty());
    assert!(stylesheet::injected_css(agent.doc()).is_none());
}

#[test]
fn rehydration_covers_every_persisted_record() {
    let mut host = snaphide::open_host_in_memory();

    let (mut doc, banner) = common::news_page();
    let body = doc.body();
    let promo = doc.append_child(body, ElementData::new("aside").with_class("promo"));
    let popup = doc.append_child(body, ElementData::new("div").with_id("newsletter-popup"));
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);

    for node in [banner, promo, popup] {
        host.page_event(1, PageEvent::MouseOver(node), 10);
        host.page_event(1, PageEvent::Click(node), 20);
    }
    assert_eq!(host.background().store().list("example.com").expect("list").len(), 3);

    // Fresh load of the same page shape
    host.close_page(1);
    let (mut doc, banner) = common::news_page();
    let body = doc.body();
    let promo = doc.append_child(body, ElementData::new("aside").with_class("promo"));
    let popup = doc.append_child(body, ElementData::new("div").with_id("newsletter-popup"));
    host.open_page(1, doc, 1_000);

    let agent = host.agent(1).expect("agent");
    assert_eq!(agent.hidden_selectors().len(), 3);
    let css = stylesheet::injected_css(agent.doc()).expect("stylesheet");
    assert!(css.contains("#ad-banner"));
    assert!(css.contains("aside.promo"));
    assert!(css.contains("#newsletter-popup"));
    for node in [banner, promo, popup] {
        assert_eq!(agent.doc().element(node).attr(DELETED_ATTR), Some("true"));
    }
}

// ============================================================================
// Double-snap and restore-all idempotence
// ============================================================================

#[test]
fn snapping_a_suppressed_element_makes_no_second_record() {
    let mut host = snaphide::open_host_in_memory();
    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);

    host.page_event(1, PageEvent::MouseOver(banner), 10);
    host.page_event(1, PageEvent::Click(banner), 20);
    host.page_event(1, PageEvent::MouseOver(banner), 30);
    host.page_event(1, PageEvent::Click(banner), 40);

    assert_eq!(
        host.background().store().list("example.com").expect("list").len(),
        1,
        "a second snap of the same suppressed element is a no-op"
    );
}

#[test]
fn restore_all_twice_is_safe() {
    let mut host = snaphide::open_host_in_memory();
    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);

    host.page_event(1, PageEvent::MouseOver(banner), 10);
    host.page_event(1, PageEvent::Click(banner), 20);

    assert!(host.dispatch(Message::RestoreAllElements, MessageSender::tab(1), 30).success);
    assert!(
        host.dispatch(Message::RestoreAllElements, MessageSender::tab(1), 40).success,
        "a second restore-all finds nothing and still succeeds"
    );
    assert_eq!(host.background().store().list("example.com").expect("list").len(), 0);
    assert!(host.agent(1).expect("agent").hidden_selectors().is_empty());
}

// ============================================================================
// Escape deactivation round trip
// ============================================================================

#[test]
fn escape_deactivates_page_and_persisted_state() {
    let mut host = snaphide::open_host_in_memory();
    let (doc, _) = common::news_page();
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);
    assert!(host.agent(1).expect("agent").is_active());

    host.page_event(1, PageEvent::KeyDown(Key::Escape), 100);

    assert!(!host.agent(1).expect("agent").is_active());
    assert!(
        !host.background().store().is_active(1).expect("persisted bit"),
        "escape flips the stored activation too"
    );
}

// ============================================================================
// Page UI side effects
// ============================================================================

#[test]
fn activation_ui_appears_and_the_notice_expires() {
    let mut host = snaphide::open_host_in_memory();
    let (doc, _) = common::news_page();
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);

    let agent = host.agent(1).expect("agent");
    let body = agent.doc().body();
    assert!(
        agent.doc().element(body).style("cursor").is_some_and(|s| s.value == "crosshair"),
        "active mode shows the crosshair cursor"
    );
    let notice = agent.notice_node().expect("notice shown on activation");
    assert!(agent.doc().is_attached(notice));

    host.pump(1_999);
    assert!(
        host.agent(1).expect("agent").notice_node().is_some(),
        "notice still up inside its two-second run"
    );
    host.pump(2_000);
    assert!(host.agent(1).expect("agent").notice_node().is_none(), "notice auto-dismissed");
}

#[test]
fn hover_positions_the_overlay_over_the_target() {
    let mut host = snaphide::open_host_in_memory();
    let (mut doc, banner) = common::news_page();
    doc.element_mut(banner).rect = snaphide::dom::dom_model::BoundingBox {
        top: 40.0,
        left: 8.0,
        width: 728.0,
        height: 90.0,
    };
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);

    host.page_event(1, PageEvent::MouseOver(banner), 10);

    let agent = host.agent(1).expect("agent");
    let overlay = agent.overlay_node().expect("overlay created at init");
    let el = agent.doc().element(overlay);
    assert!(el.style("display").is_some_and(|s| s.value == "block"));
    assert!(el.style("left").is_some_and(|s| s.value == "8px"));
    assert!(el.style("top").is_some_and(|s| s.value == "40px"));
    assert!(el.style("width").is_some_and(|s| s.value == "728px"));
    assert!(el.style("height").is_some_and(|s| s.value == "90px"));
    assert_eq!(el.text.as_deref(), Some("ad-banner"));

    host.page_event(1, PageEvent::MouseOut(banner), 20);
    let agent = host.agent(1).expect("agent");
    let el = agent.doc().element(agent.overlay_node().expect("overlay"));
    assert!(el.style("display").is_some_and(|s| s.value == "none"));
}

// ============================================================================
// Dynamic content through the frame pump
// ============================================================================

#[test]
fn reinserted_content_is_rehidden_within_one_window() {
    let mut host = snaphide::open_host_in_memory();
    let (doc, banner) = common::news_page();
    host.open_page(1, doc, 0);
    activate(&mut host, 1, 0);

    host.page_event(1, PageEvent::MouseOver(banner), 10);
    host.page_event(1, PageEvent::Click(banner), 20);

    // The page script re-creates the banner
    let agent = host.agent_mut(1).expect("agent");
    let body = agent.doc().body();
    let revived = agent
        .doc_mut()
        .append_child(body, ElementData::new("div").with_id("ad-banner"));

    host.pump(100); // picks the insertion up, opens the window
    assert!(host.agent(1).expect("agent").has_pending_mutations());
    host.pump(150); // window elapsed: the batch is matched

    let agent = host.agent(1).expect("agent");
    assert_eq!(
        agent.doc().element(revived).attr(DELETED_ATTR),
        Some("true"),
        "the lookalike is pinned down within one coalescing window"
    );
    assert!(!agent.has_pending_mutations());
}
