use snaphide::dom::document::Document;
use snaphide::dom::dom_model::{ElementData, NodeId};

/// A small news-site page: header, main content, and an ad banner with a
/// page-unique id.
pub fn news_page() -> (Document, NodeId) {
    let mut doc = Document::new("https://example.com/news", "Example News");
    let body = doc.body();

    let header = doc.append_child(body, ElementData::new("header").with_class("site-header"));
    doc.append_child(header, ElementData::new("h1").with_text("Example News"));

    let main = doc.append_child(body, ElementData::new("main").with_class("content"));
    doc.append_child(main, ElementData::new("p").with_text("Top story"));
    let banner = doc.append_child(
        main,
        ElementData::new("div")
            .with_id("ad-banner")
            .with_class("ad banner")
            .with_text("Buy things"),
    );

    (doc, banner)
}

/// Two structurally identical cards (same tag, same class, no id) under
/// one section.
pub fn twin_card_page() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new("https://example.com/cards", "Cards");
    let body = doc.body();
    let section = doc.append_child(body, ElementData::new("section"));
    let first = doc.append_child(
        section,
        ElementData::new("div").with_class("card").with_text("one"),
    );
    let second = doc.append_child(
        section,
        ElementData::new("div").with_class("card").with_text("two"),
    );
    (doc, first, second)
}
