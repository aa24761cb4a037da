mod common;

use snaphide::activation::machine::{
    ActivationMachine, Key, Mode, NOTICE_DURATION_MS, OVERLAY_CLASS, PageEvent, UiCommand,
    is_extension_element,
};
use snaphide::dom::dom_model::ElementData;

// ============================================================================
// Mode transitions
// ============================================================================

#[test]
fn activation_sets_cursor_and_shows_the_notice() {
    let mut machine = ActivationMachine::default();
    assert_eq!(machine.mode(), Mode::Inactive);

    let commands = machine.set_active(true, 1_000);
    assert_eq!(
        commands,
        vec![UiCommand::SetCursor("crosshair"), UiCommand::ShowNotice]
    );
    assert!(machine.is_active());
}

#[test]
fn deactivation_reverses_the_page_affordances() {
    let mut machine = ActivationMachine::default();
    machine.set_active(true, 0);

    let commands = machine.set_active(false, 100);
    assert_eq!(
        commands,
        vec![
            UiCommand::ClearCursor,
            UiCommand::HideOverlay,
            UiCommand::DismissNotice,
        ]
    );
    assert!(!machine.is_active());
}

#[test]
fn redundant_toggles_do_nothing() {
    let mut machine = ActivationMachine::default();

    assert!(machine.set_active(false, 0).is_empty(), "inactive to inactive");
    machine.set_active(true, 0);
    assert!(machine.set_active(true, 10).is_empty(), "active to active");
}

#[test]
fn notice_auto_dismisses_after_its_deadline() {
    let mut machine = ActivationMachine::default();
    machine.set_active(true, 1_000);

    assert!(machine.pump(1_000 + NOTICE_DURATION_MS - 1).is_empty());
    assert_eq!(
        machine.pump(1_000 + NOTICE_DURATION_MS),
        vec![UiCommand::DismissNotice]
    );
    assert!(machine.pump(10_000).is_empty(), "dismissal fires exactly once");
}

// ============================================================================
// Event routing
// ============================================================================

#[test]
fn inactive_mode_intercepts_nothing() {
    let (doc, banner) = common::news_page();
    let mut machine = ActivationMachine::default();

    assert!(machine.handle_event(&doc, PageEvent::MouseOver(banner)).is_empty());
    assert!(machine.handle_event(&doc, PageEvent::Click(banner)).is_empty());
    assert!(machine.handle_event(&doc, PageEvent::KeyDown(Key::Escape)).is_empty());
}

#[test]
fn hover_shows_the_overlay_with_the_descriptor() {
    let (doc, banner) = common::news_page();
    let mut machine = ActivationMachine::default();
    machine.set_active(true, 0);

    let commands = machine.handle_event(&doc, PageEvent::MouseOver(banner));
    assert_eq!(
        commands,
        vec![UiCommand::ShowOverlay {
            target: banner,
            descriptor: "ad-banner".to_string(),
        }]
    );
    assert_eq!(machine.hovered(), Some(banner));

    let commands = machine.handle_event(&doc, PageEvent::MouseOut(banner));
    assert_eq!(commands, vec![UiCommand::HideOverlay]);
    assert_eq!(machine.hovered(), None);
}

#[test]
fn click_snaps_the_hovered_element_and_swallows_the_event() {
    let (doc, banner) = common::news_page();
    let mut machine = ActivationMachine::default();
    machine.set_active(true, 0);

    machine.handle_event(&doc, PageEvent::MouseOver(banner));
    let commands = machine.handle_event(&doc, PageEvent::Click(banner));
    assert_eq!(
        commands,
        vec![
            UiCommand::PreventDefault,
            UiCommand::HideOverlay,
            UiCommand::Snap { target: banner },
        ]
    );
}

#[test]
fn click_without_hover_still_prevents_default() {
    let (doc, banner) = common::news_page();
    let mut machine = ActivationMachine::default();
    machine.set_active(true, 0);

    let commands = machine.handle_event(&doc, PageEvent::Click(banner));
    assert_eq!(commands, vec![UiCommand::PreventDefault, UiCommand::HideOverlay]);
}

#[test]
fn context_menu_is_suppressed_while_active() {
    let (doc, banner) = common::news_page();
    let mut machine = ActivationMachine::default();
    machine.set_active(true, 0);

    let commands = machine.handle_event(&doc, PageEvent::ContextMenu(banner));
    assert_eq!(commands, vec![UiCommand::PreventDefault]);
}

#[test]
fn escape_requests_deactivation_through_the_coordinator() {
    let (doc, _) = common::news_page();
    let mut machine = ActivationMachine::default();
    machine.set_active(true, 0);

    let commands = machine.handle_event(&doc, PageEvent::KeyDown(Key::Escape));
    assert_eq!(commands, vec![UiCommand::RequestDeactivate]);
    assert!(
        machine.is_active(),
        "the machine waits for the coordinator to flip the persisted state"
    );

    assert!(machine.handle_event(&doc, PageEvent::KeyDown(Key::Other)).is_empty());
}

// ============================================================================
// Extension-owned elements
// ============================================================================

#[test]
fn extension_elements_are_never_targets() {
    let (mut doc, _) = common::news_page();
    let body = doc.body();
    let overlay = doc.append_child(body, ElementData::new("div").with_class(OVERLAY_CLASS));
    let overlay_label = doc.append_child(overlay, ElementData::new("span"));

    assert!(is_extension_element(&doc, overlay));
    assert!(
        is_extension_element(&doc, overlay_label),
        "children of extension nodes count too"
    );

    let mut machine = ActivationMachine::default();
    machine.set_active(true, 0);

    assert!(machine.handle_event(&doc, PageEvent::MouseOver(overlay)).is_empty());
    assert!(machine.handle_event(&doc, PageEvent::Click(overlay_label)).is_empty());
    assert!(machine.handle_event(&doc, PageEvent::ContextMenu(overlay)).is_empty());
    assert_eq!(machine.hovered(), None, "extension elements never become the hover target");
}
