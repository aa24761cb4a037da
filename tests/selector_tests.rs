mod common;

use snaphide::dom::document::Document;
use snaphide::dom::dom_model::ElementData;
use snaphide::error::SnapHideError;
use snaphide::selector::generator::{MAX_SELECTOR_DEPTH, SelectorGenerator};
use snaphide::selector::matcher::{self, css_escape};

// ============================================================================
// Generation: id terminal case
// ============================================================================

#[test]
fn element_with_id_gets_bare_id_selector() {
    let (doc, banner) = common::news_page();
    let mut generator = SelectorGenerator::default();

    let selector = generator.generate(&doc, banner);
    assert_eq!(selector, "#ad-banner", "page-unique id should short-circuit the walk");

    let compiled = matcher::compile(&selector).expect("generated selector must compile");
    assert!(
        compiled.matches(&doc, banner),
        "generated selector must match its own element"
    );
    assert_eq!(
        compiled.query(&doc),
        vec![banner],
        "id selector should match exactly one element"
    );
}

#[test]
fn id_with_special_characters_is_escaped_and_round_trips() {
    let mut doc = Document::new("https://example.com/", "t");
    let body = doc.body();
    let node = doc.append_child(body, ElementData::new("div").with_id("user:profile.panel"));

    let mut generator = SelectorGenerator::default();
    let selector = generator.generate(&doc, node);
    assert_eq!(selector, "#user\\:profile\\.panel");

    let compiled = matcher::compile(&selector).expect("escaped selector must compile");
    assert!(compiled.matches(&doc, node), "escaped id must match the original element");
}

#[test]
fn class_with_leading_digit_is_hex_escaped() {
    let mut doc = Document::new("https://example.com/", "t");
    let body = doc.body();
    let node = doc.append_child(body, ElementData::new("div").with_class("3col"));

    let mut generator = SelectorGenerator::default();
    let selector = generator.generate(&doc, node);
    assert_eq!(selector, "div.\\33 col", "leading digit needs a hex escape");

    let compiled = matcher::compile(&selector).expect("hex-escaped selector must compile");
    assert!(compiled.matches(&doc, node));
}

#[test]
fn css_escape_passes_plain_identifiers_through() {
    assert_eq!(css_escape("sidebar"), "sidebar");
    assert_eq!(css_escape("nav-item_2"), "nav-item_2");
    assert_eq!(css_escape("a b"), "a\\ b");
}

// ============================================================================
// Generation: ancestor walk
// ============================================================================

#[test]
fn generation_is_deterministic() {
    let (doc, banner) = common::news_page();
    let mut generator = SelectorGenerator::default();

    let first = generator.generate(&doc, banner);
    let second = generator.generate(&doc, banner);
    assert_eq!(first, second, "same element, same DOM, same selector");
}

#[test]
fn cache_hits_on_repeated_generation() {
    let (doc, banner) = common::news_page();
    let mut generator = SelectorGenerator::default();

    generator.generate(&doc, banner);
    assert_eq!(generator.cache_len(), 1);
    generator.generate(&doc, banner);
    assert_eq!(generator.cache_len(), 1, "second generation should be a cache hit");
}

#[test]
fn walk_emits_tag_and_class_segments() {
    let mut doc = Document::new("https://example.com/", "t");
    let body = doc.body();
    let nav = doc.append_child(body, ElementData::new("nav").with_class("top-bar"));
    let link = doc.append_child(nav, ElementData::new("a").with_class("brand"));

    let mut generator = SelectorGenerator::default();
    let selector = generator.generate(&doc, link);
    assert_eq!(selector, "nav.top-bar a.brand");

    let compiled = matcher::compile(&selector).expect("walk selector must compile");
    assert_eq!(compiled.query(&doc), vec![link]);
}

#[test]
fn positional_qualifier_only_when_siblings_force_it() {
    let mut doc = Document::new("https://example.com/", "t");
    let body = doc.body();
    let list = doc.append_child(body, ElementData::new("ul"));
    let only_span = doc.append_child(list, ElementData::new("span"));
    let first_li = doc.append_child(list, ElementData::new("li"));
    let second_li = doc.append_child(list, ElementData::new("li"));

    let mut generator = SelectorGenerator::default();
    assert_eq!(
        generator.generate(&doc, only_span),
        "ul span",
        "a lone same-tag child needs no positional qualifier"
    );
    assert_eq!(generator.generate(&doc, first_li), "ul li:nth-of-type(1)");

    let mut fresh = SelectorGenerator::default();
    assert_eq!(fresh.generate(&doc, second_li), "ul li:nth-of-type(2)");
}

#[test]
fn identical_siblings_differ_only_in_position() {
    let (doc, first, second) = common::twin_card_page();

    // Twin cards share tag, id, and class, so each gets its own generator
    // (the cache key cannot tell them apart by design).
    let sel_first = SelectorGenerator::default().generate(&doc, first);
    let sel_second = SelectorGenerator::default().generate(&doc, second);

    assert_eq!(sel_first, "section div.card:nth-of-type(1)");
    assert_eq!(sel_second, "section div.card:nth-of-type(2)");
    assert_ne!(sel_first, sel_second);

    let compiled_first = matcher::compile(&sel_first).expect("compile first");
    let compiled_second = matcher::compile(&sel_second).expect("compile second");
    assert_eq!(compiled_first.query(&doc), vec![first]);
    assert_eq!(compiled_second.query(&doc), vec![second]);
}

#[test]
fn walk_stops_at_depth_cap() {
    let mut doc = Document::new("https://example.com/", "t");
    let mut parent = doc.body();
    let mut deepest = parent;
    for i in 0..8 {
        deepest = doc.append_child(
            parent,
            ElementData::new("div").with_class(&format!("level-{}", i)),
        );
        parent = deepest;
    }

    let mut generator = SelectorGenerator::default();
    let selector = generator.generate(&doc, deepest);
    assert_eq!(
        selector.split(' ').count(),
        MAX_SELECTOR_DEPTH,
        "ancestor segments must stop at the cap"
    );

    let compiled = matcher::compile(&selector).expect("capped selector must compile");
    assert!(compiled.matches(&doc, deepest), "capped selector still matches its element");
}

#[test]
fn direct_body_child_never_fails() {
    let mut doc = Document::new("https://example.com/", "t");
    let body = doc.body();
    let bare = doc.append_child(body, ElementData::new("footer"));

    let mut generator = SelectorGenerator::default();
    assert_eq!(
        generator.generate(&doc, bare),
        "footer",
        "no id, no class, no siblings: bare tag"
    );
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn child_combinator_is_accepted_for_stored_selectors() {
    let mut doc = Document::new("https://example.com/", "t");
    let body = doc.body();
    let outer = doc.append_child(body, ElementData::new("div").with_class("wrap"));
    let inner = doc.append_child(outer, ElementData::new("p"));

    let compiled = matcher::compile("div.wrap > p").expect("child combinator must compile");
    assert!(compiled.matches(&doc, inner));

    let deeper_wrap = doc.append_child(inner, ElementData::new("span"));
    assert!(
        !compiled.matches(&doc, deeper_wrap),
        "child combinator must not match grandchildren"
    );
}

#[test]
fn descendant_combinator_skips_levels() {
    let mut doc = Document::new("https://example.com/", "t");
    let body = doc.body();
    let article = doc.append_child(body, ElementData::new("article"));
    let section = doc.append_child(article, ElementData::new("section"));
    let em = doc.append_child(section, ElementData::new("em"));

    let compiled = matcher::compile("article em").expect("descendant selector must compile");
    assert!(compiled.matches(&doc, em));
}

#[test]
fn detached_elements_never_query() {
    let (mut doc, banner) = common::news_page();
    let compiled = matcher::compile("#ad-banner").expect("compile");

    assert_eq!(compiled.query(&doc).len(), 1);
    doc.detach(banner);
    assert!(
        compiled.query(&doc).is_empty(),
        "detached subtrees are invisible to queries"
    );
}

// ============================================================================
// Invalid selectors
// ============================================================================

#[test]
fn unsupported_syntax_is_an_invalid_selector_error() {
    for bad in ["", "   ", "div[data-x=1]", "a, b", "p:hover", ":nth-of-type()", "#"] {
        match matcher::compile(bad) {
            Err(SnapHideError::InvalidSelector { selector, .. }) => {
                assert_eq!(selector, bad, "error should carry the offending selector");
            }
            Ok(_) => panic!("selector {:?} should not compile", bad),
            Err(other) => panic!("expected InvalidSelector for {:?}, got {}", bad, other),
        }
    }
}

#[test]
fn nth_of_type_index_must_be_positive() {
    assert!(
        matcher::compile("li:nth-of-type(0)").is_err(),
        ":nth-of-type is 1-based"
    );
    assert!(matcher::compile("li:nth-of-type(1)").is_ok());
}
