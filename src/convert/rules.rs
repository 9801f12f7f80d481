//! Rules the clipper registers on top of the built-in CommonMark ones.

use dom_query::NodeRef;

use super::engine::{self, ConversionEngine, Filter, StyleOptions};
use crate::dom;

/// Elements emitted as raw HTML.
pub const KEPT_TAGS: &[&str] = &["table", "tr", "td", "th", "thead", "tbody"];

/// Register the clipper's rules and keep set on `engine`.
pub fn register_clipper_rules(engine: &mut ConversionEngine) {
    engine
        .keep(KEPT_TAGS)
        .register_rule("fencedCode", Filter::tags(&["pre", "code"]), fenced_code)
        .register_rule("lineBreaks", Filter::tags(&["br"]), line_break)
        .register_rule("blockquotes", Filter::tags(&["blockquote"]), blockquote)
        .register_rule("images", Filter::tags(&["img"]), image);
}

/// `pre` and `code` become fenced blocks of their raw text.
fn fenced_code(_content: &str, node: &NodeRef<'_>, style: &StyleOptions) -> String {
    let language = engine::language_class(node)
        .or_else(|| {
            let is_pre = dom::node_tag_name(node).as_deref() == Some("pre");
            if is_pre {
                dom::first_child_element(node, "code").and_then(|code| engine::language_class(&code))
            } else {
                None
            }
        })
        .unwrap_or_default();

    let text = node.text();
    engine::fenced_block(trim_blank_lines(&text), &language, &style.fence)
}

fn line_break(_content: &str, _node: &NodeRef<'_>, _style: &StyleOptions) -> String {
    "  \n".to_string()
}

fn blockquote(content: &str, _node: &NodeRef<'_>, _style: &StyleOptions) -> String {
    format!("\n\n{}\n\n", engine::prefix_lines(trim_blank_lines(content), "> "))
}

fn image(_content: &str, node: &NodeRef<'_>, _style: &StyleOptions) -> String {
    let alt = dom::node_attribute(node, "alt").unwrap_or_default().replace(['\r', '\n'], " ");
    let src = dom::node_attribute(node, "src").unwrap_or_default();
    engine::image(&alt, &src, dom::node_attribute(node, "title").as_deref())
}

/// Drop whitespace-only lines at both ends of `text`.
fn trim_blank_lines(text: &str) -> &str {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }

    let rest = &text[start..];
    let mut end = rest.len();
    while let Some(idx) = rest[..end].rfind('\n') {
        if !rest[idx + 1..end].trim().is_empty() {
            break;
        }
        end = idx;
    }
    if rest[..end].trim().is_empty() {
        return "";
    }
    &rest[..end]
}
