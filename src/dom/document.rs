use crate::dom::dom_model::{ElementData, Node, NodeId};

/// In-memory element tree for one page load.
///
/// Arena-backed: nodes are never freed, only detached, so `NodeId`s stay
/// valid for the lifetime of the document. Queries traverse from the root
/// and therefore never see detached nodes. Insertions are recorded in a
/// drainable log, the equivalent of a childList mutation observer.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    pub url: String,
    pub title: String,
    inserted: Vec<NodeId>,
}

impl Document {
    /// New document with the usual html/head/body skeleton.
    pub fn new(url: &str, title: &str) -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            url: url.to_string(),
            title: title.to_string(),
            inserted: Vec::new(),
        };
        let root = doc.push_node(ElementData::new("html"), None);
        let head = doc.push_node(ElementData::new("head"), Some(root));
        let body = doc.push_node(ElementData::new("body"), Some(root));
        doc.root = root;
        doc.head = head;
        doc.body = body;
        // Skeleton nodes are not "inserted" content
        doc.inserted.clear();
        doc
    }

    fn push_node(&mut self, data: ElementData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        self.inserted.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Hostname component of the document URL (scheme and port stripped).
    pub fn hostname(&self) -> String {
        let rest = match self.url.find("://") {
            Some(i) => &self.url[i + 3..],
            None => self.url.as_str(),
        };
        let end = rest.find(['/', ':', '?', '#']).unwrap_or(rest.len());
        rest[..end].to_string()
    }

    pub fn element(&self, id: NodeId) -> &ElementData {
        &self.nodes[id.0].data
    }

    pub fn element_mut(&mut self, id: NodeId) -> &mut ElementData {
        &mut self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Append a child element; records it in the insertion log.
    pub fn append_child(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        self.push_node(data, Some(parent))
    }

    /// Insert an element as the parent's first child (cascade-priority spot
    /// for injected stylesheets).
    pub fn insert_first_child(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.push_node(data, Some(parent));
        let children = &mut self.nodes[parent.0].children;
        children.pop();
        children.insert(0, id);
        id
    }

    /// Detach a node (and implicitly its subtree) from the tree.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
        self.nodes[id.0].parent = None;
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// All attached elements in document (preorder) order.
    pub fn all_elements(&self) -> Vec<NodeId> {
        self.descendants_inclusive(self.root)
    }

    /// `id` followed by its attached descendants, preorder.
    pub fn descendants_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            for child in self.nodes[n.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Nearest ancestor-or-self satisfying the predicate.
    pub fn closest<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        let mut current = Some(id);
        while let Some(n) = current {
            if predicate(&self.nodes[n.0].data) {
                return Some(n);
            }
            current = self.nodes[n.0].parent;
        }
        None
    }

    /// First attached element whose attribute equals `value`.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .find(|n| self.element(*n).attr(name) == Some(value))
    }

    /// All attached elements carrying the attribute, in document order.
    pub fn find_all_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.all_elements()
            .into_iter()
            .filter(|n| self.element(*n).attr(name).is_some())
            .collect()
    }

    /// 1-based index of `id` among its same-tag siblings, and that sibling
    /// count. Detached or root nodes index as (1, 1).
    pub fn same_tag_position(&self, id: NodeId) -> (usize, usize) {
        let tag = &self.nodes[id.0].data.tag;
        let Some(parent) = self.nodes[id.0].parent else {
            return (1, 1);
        };
        let same_tag: Vec<NodeId> = self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|c| self.nodes[c.0].data.tag == *tag)
            .collect();
        let index = same_tag.iter().position(|c| *c == id).map_or(0, |i| i + 1);
        (index, same_tag.len())
    }

    /// Drain the insertion log (nodes added since the last drain).
    pub fn take_inserted(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.inserted)
    }

    /// Markup of the element's children and text.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = &self.nodes[id.0].data.text {
            out.push_str(text);
        }
        for child in &self.nodes[id.0].children {
            out.push_str(&self.outer_html(*child));
        }
        out
    }

    /// Markup of the element itself, attributes and inline styles included.
    pub fn outer_html(&self, id: NodeId) -> String {
        let el = &self.nodes[id.0].data;
        let mut out = String::new();
        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        let style_text = el.style_text();
        if !style_text.is_empty() {
            out.push_str(" style=\"");
            out.push_str(&style_text);
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.inner_html(id));
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
        out
    }
}
