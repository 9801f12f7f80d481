//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by every pipeline stage.
//! Attribute and tag access return owned `String`s and lowercase tag names
//! for both `Selection`s and bare `NodeRef`s.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

// === Parsing & Cloning ===

/// Parse an HTML string into a detached document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Clone a document by round-tripping it through its serialization.
///
/// The clone shares nothing with the original, so callers may mutate it
/// freely without touching the page the user is looking at.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

/// Clone HTML fragments into a fresh `<div>` container and serialize it.
///
/// Returns the container's inner HTML.
#[must_use]
pub fn detached_container<S: AsRef<str>>(fragments: &[S]) -> String {
    let doc = Document::from("<div></div>");
    let container = doc.select("div");
    for fragment in fragments {
        container.append_html(fragment.as_ref());
    }
    container.inner_html().to_string()
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Get an attribute value from a single node.
#[inline]
#[must_use]
pub fn node_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

// === Tag/Node Information ===

/// Get the lowercase tag name of a node; `None` for text and other non-elements.
#[must_use]
pub fn node_tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Iterate the direct child nodes of a node, text nodes included.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut children = Vec::new();
    let mut next = node.first_child();
    while let Some(child) = next {
        next = child.next_sibling();
        children.push(child);
    }
    children
}

/// First direct child element with the given tag.
#[must_use]
pub fn first_child_element<'a>(node: &NodeRef<'a>, tag: &str) -> Option<NodeRef<'a>> {
    child_nodes(node)
        .into_iter()
        .find(|child| node_tag_name(child).is_some_and(|t| t == tag))
}

/// Next sibling that is an element, skipping text nodes.
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

// === Markup ===

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

// === Meta Lookup ===

/// Content of the first `<meta>` whose `attr` equals `value`, trimmed.
///
/// A matching tag without a `content` attribute, or with blank content,
/// yields `None`.
#[must_use]
pub fn meta_content(doc: &Document, attr: &str, value: &str) -> Option<String> {
    let selector = format!("meta[{attr}=\"{value}\"]");
    let node = doc.select(&selector).nodes().first().copied()?;
    let content = node_attribute(&node, "content")?;
    let content = content.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}
