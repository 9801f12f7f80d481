//! Rule-driven HTML to Markdown engine.
//!
//! The engine walks a parsed fragment depth first. Every element's children
//! are converted before the element itself, and the element's replacement is
//! then chosen in this order:
//!
//! 1. blank elements (no text, no images or other meaningful content) vanish;
//! 2. registered rules, first match wins;
//! 3. `keep` rules, which emit the element's raw HTML;
//! 4. the built-in CommonMark rules;
//! 5. everything else passes its content through, wrapped in blank lines
//!    when the element is block-level.

use std::collections::HashSet;

use dom_query::{Document, NodeRef};

use crate::dom;
use crate::markdown;

/// Block-level elements: their replacement starts and ends a block.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas", "center", "dd", "dir", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "frameset", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu", "nav", "noframes", "noscript", "ol",
    "output", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Elements without content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements that are converted even when they hold no text.
const MEANINGFUL_WHEN_BLANK: &[&str] =
    &["a", "table", "thead", "tbody", "tfoot", "th", "td", "iframe", "script", "audio", "video"];

/// Heading flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// `Title` underlined with `=` or `-` (levels 1 and 2 only)
    Setext,
}

/// Code block flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Fenced with [`StyleOptions::fence`].
    #[default]
    Fenced,
    /// Indented by four spaces.
    Indented,
}

/// Output style of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    /// Heading flavour. Default: ATX
    pub heading_style: HeadingStyle,

    /// Thematic break. Default: `---`
    pub hr: String,

    /// Marker of unordered list items. Default: `-`
    pub bullet_list_marker: String,

    /// Code block flavour. Default: fenced
    pub code_block_style: CodeBlockStyle,

    /// Minimum code fence. Default: three backticks
    pub fence: String,

    /// Emphasis delimiter. Default: `*`
    pub em_delimiter: String,

    /// Strong delimiter. Default: `**`
    pub strong_delimiter: String,

    /// Text emitted before the newline of a hard line break. Default: two spaces
    pub br: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "---".to_string(),
            bullet_list_marker: "-".to_string(),
            code_block_style: CodeBlockStyle::Fenced,
            fence: "```".to_string(),
            em_delimiter: "*".to_string(),
            strong_delimiter: "**".to_string(),
            br: "  ".to_string(),
        }
    }
}

/// Decides whether a rule applies to an element.
pub enum Filter {
    /// Matches elements with one of these lowercase tag names.
    Tags(Vec<String>),
    /// Matches elements for which the predicate holds.
    Predicate(Box<dyn Fn(&NodeRef<'_>) -> bool>),
}

impl Filter {
    /// Filter on tag names.
    #[must_use]
    pub fn tags(tags: &[&str]) -> Self {
        Self::Tags(tags.iter().map(|t| t.to_ascii_lowercase()).collect())
    }

    /// Filter on an arbitrary predicate.
    #[must_use]
    pub fn predicate(predicate: impl Fn(&NodeRef<'_>) -> bool + 'static) -> Self {
        Self::Predicate(Box::new(predicate))
    }

    fn matches(&self, tag: &str, node: &NodeRef<'_>) -> bool {
        match self {
            Self::Tags(tags) => tags.iter().any(|t| t == tag),
            Self::Predicate(predicate) => predicate(node),
        }
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tags(tags) => f.debug_tuple("Tags").field(tags).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Produces an element's Markdown from its converted content.
pub type Replacement = Box<dyn Fn(&str, &NodeRef<'_>, &StyleOptions) -> String>;

/// A named conversion rule.
pub struct Rule {
    name: String,
    filter: Filter,
    replacement: Replacement,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).field("filter", &self.filter).finish_non_exhaustive()
    }
}

/// HTML to Markdown converter with pluggable rules.
#[derive(Debug, Default)]
pub struct ConversionEngine {
    style: StyleOptions,
    rules: Vec<Rule>,
    keep: HashSet<String>,
}

impl ConversionEngine {
    /// Engine with the given style and no extra rules.
    #[must_use]
    pub fn new(style: StyleOptions) -> Self {
        Self {
            style,
            rules: Vec::new(),
            keep: HashSet::new(),
        }
    }

    /// Style in use.
    #[must_use]
    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    /// Register a rule. Rules are tried in registration order, before the
    /// built-in ones.
    pub fn register_rule(
        &mut self,
        name: &str,
        filter: Filter,
        replacement: impl Fn(&str, &NodeRef<'_>, &StyleOptions) -> String + 'static,
    ) -> &mut Self {
        self.rules.push(Rule {
            name: name.to_string(),
            filter,
            replacement: Box::new(replacement),
        });
        self
    }

    /// Emit these elements as raw HTML.
    pub fn keep(&mut self, tags: &[&str]) -> &mut Self {
        self.keep.extend(tags.iter().map(|t| t.to_ascii_lowercase()));
        self
    }

    /// Names of the registered rules, in order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Convert an HTML fragment to Markdown.
    #[must_use]
    pub fn convert(&self, html: &str) -> String {
        let doc = Document::from(html);
        let Some(body) = doc.select("body").nodes().first().copied() else {
            return String::new();
        };
        markdown::clean_output(&self.process(&body, false))
    }

    /// Convert the children of `node` and join them.
    fn process(&self, node: &NodeRef<'_>, in_code: bool) -> String {
        let mut output = String::new();

        for child in dom::child_nodes(node) {
            let chunk = if child.is_text() {
                self.text_replacement(&child, in_code)
            } else if child.is_element() {
                self.element_replacement(&child, in_code)
            } else {
                continue;
            };

            let mut chunk = chunk.as_str();
            if !in_code {
                // No spaces around a block seam, and never two in a row
                if chunk.starts_with('\n') {
                    output.truncate(output.trim_end_matches(' ').len());
                } else if output.ends_with([' ', '\n']) {
                    chunk = chunk.trim_start_matches(' ');
                }
            }

            output = markdown::join_chunks(&output, chunk);
        }

        output
    }

    fn text_replacement(&self, node: &NodeRef<'_>, in_code: bool) -> String {
        let text = node.text();
        if in_code {
            return text.to_string();
        }

        let collapsed = markdown::collapse_whitespace(&text);
        let at_start = edge_is_block(node, Direction::Backward);
        let at_end = edge_is_block(node, Direction::Forward);

        if collapsed.trim_matches(' ').is_empty() {
            return if collapsed.is_empty() || at_start || at_end {
                String::new()
            } else {
                " ".to_string()
            };
        }

        let mut value = collapsed.as_str();
        if at_start {
            value = value.trim_start_matches(' ');
        }
        if at_end {
            value = value.trim_end_matches(' ');
        }

        // Escape the text proper; keep flanking spaces out of line-start rules
        let trimmed = value.trim_start_matches(' ');
        let lead = &value[..value.len() - trimmed.len()];
        format!("{lead}{}", markdown::escape_markdown(trimmed))
    }

    fn element_replacement(&self, node: &NodeRef<'_>, in_code: bool) -> String {
        let Some(tag) = dom::node_tag_name(node) else {
            return String::new();
        };
        let block = is_block(&tag);

        if is_blank(node, &tag) {
            return if block { "\n\n".to_string() } else { String::new() };
        }

        let content = self.process(node, in_code || tag == "pre" || tag == "code");

        if let Some(rule) = self.rules.iter().find(|r| r.filter.matches(&tag, node)) {
            return (rule.replacement)(&content, node, &self.style);
        }

        if self.keep.contains(&tag) {
            let html = node.html().to_string();
            return if block { format!("\n\n{html}\n\n") } else { html };
        }

        self.builtin(&tag, &content, node, block)
    }

    fn builtin(&self, tag: &str, content: &str, node: &NodeRef<'_>, block: bool) -> String {
        let style = &self.style;
        match tag {
            "p" => format!("\n\n{}\n\n", trim_spaces(content)),
            "br" => format!("{}\n", style.br),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                heading(trim_spaces(content), level, style.heading_style)
            }
            "blockquote" => {
                let inner = content.trim_matches('\n');
                format!("\n\n{}\n\n", prefix_lines(inner, "> "))
            }
            "ul" | "ol" => {
                let nested_last = node.parent().is_some_and(|p| dom::node_tag_name(&p).as_deref() == Some("li"))
                    && dom::next_element_sibling(node).is_none();
                if nested_last {
                    format!("\n{content}")
                } else {
                    format!("\n\n{content}\n\n")
                }
            }
            "li" => self.list_item(content, node),
            "hr" => format!("\n\n{}\n\n", style.hr),
            "a" => match dom::node_attribute(node, "href").filter(|h| !h.trim().is_empty()) {
                Some(href) => inline_link(content, &href, dom::node_attribute(node, "title").as_deref()),
                None => content.to_string(),
            },
            "em" | "i" => wrap_inline(content, &style.em_delimiter, &style.em_delimiter),
            "strong" | "b" => wrap_inline(content, &style.strong_delimiter, &style.strong_delimiter),
            "code" => inline_code(content),
            "pre" => self.code_block(node),
            "img" => {
                let alt = dom::node_attribute(node, "alt").unwrap_or_default();
                let src = dom::node_attribute(node, "src").unwrap_or_default();
                image(&alt, &src, dom::node_attribute(node, "title").as_deref())
            }
            _ if block => format!("\n\n{}\n\n", trim_spaces(content)),
            _ => content.to_string(),
        }
    }

    fn list_item(&self, content: &str, node: &NodeRef<'_>) -> String {
        let parent = node.parent();
        let prefix = match parent.filter(|p| dom::node_tag_name(p).as_deref() == Some("ol")) {
            Some(ol) => {
                let start = dom::node_attribute(&ol, "start")
                    .and_then(|s| s.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                let index = dom::child_nodes(&ol)
                    .iter()
                    .filter(|c| dom::node_tag_name(c).as_deref() == Some("li"))
                    .position(|c| c.id == node.id)
                    .unwrap_or(0);
                format!("{}. ", start + index)
            }
            None => format!("{} ", self.style.bullet_list_marker),
        };

        let indent = " ".repeat(prefix.chars().count());
        let body = content.trim_start_matches('\n');
        let body = trim_spaces(body);
        let trailing_newline = body.ends_with('\n');
        let body = body.trim_end_matches('\n');
        let body = body.replace('\n', &format!("\n{indent}"));
        let body = if trailing_newline { format!("{body}\n") } else { body };

        let has_next = dom::next_element_sibling(node).is_some();
        if has_next && !body.ends_with('\n') {
            format!("{prefix}{body}\n")
        } else {
            format!("{prefix}{body}")
        }
    }

    fn code_block(&self, node: &NodeRef<'_>) -> String {
        let code = node.text().to_string();
        match self.style.code_block_style {
            CodeBlockStyle::Fenced => {
                let language = dom::first_child_element(node, "code")
                    .and_then(|c| language_class(&c))
                    .unwrap_or_default();
                fenced_block(code.trim_end_matches('\n'), &language, &self.style.fence)
            }
            CodeBlockStyle::Indented => {
                format!("\n\n{}\n\n", prefix_lines(code.trim_end_matches('\n'), "    "))
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

/// Whether the neighbour of a text node in `direction` ends an inline run:
/// a block element, a line break, or the edge of a block parent.
fn edge_is_block(node: &NodeRef<'_>, direction: Direction) -> bool {
    let mut sibling = match direction {
        Direction::Backward => node.prev_sibling(),
        Direction::Forward => node.next_sibling(),
    };

    while let Some(s) = sibling {
        if s.is_text() {
            return false;
        }
        if let Some(tag) = dom::node_tag_name(&s) {
            return is_block(&tag) || (tag == "br" && matches!(direction, Direction::Backward));
        }
        sibling = match direction {
            Direction::Backward => s.prev_sibling(),
            Direction::Forward => s.next_sibling(),
        };
    }

    node.parent()
        .and_then(|p| dom::node_tag_name(&p))
        .is_none_or(|tag| is_block(&tag))
}

/// Whether an element is block-level.
#[must_use]
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

fn is_blank(node: &NodeRef<'_>, tag: &str) -> bool {
    if VOID_ELEMENTS.contains(&tag) || MEANINGFUL_WHEN_BLANK.contains(&tag) {
        return false;
    }
    if !node.text().trim().is_empty() {
        return false;
    }
    !has_meaningful_descendant(node)
}

fn has_meaningful_descendant(node: &NodeRef<'_>) -> bool {
    dom::child_nodes(node).iter().any(|child| {
        dom::node_tag_name(child).is_some_and(|tag| {
            VOID_ELEMENTS.contains(&tag.as_str())
                || MEANINGFUL_WHEN_BLANK.contains(&tag.as_str())
                || has_meaningful_descendant(child)
        })
    })
}

fn trim_spaces(content: &str) -> &str {
    content.trim_matches(|c| c == ' ' || c == '\t')
}

/// Prefix every line of `text` with `prefix`.
#[must_use]
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    text.split('\n').map(|line| format!("{prefix}{line}")).collect::<Vec<_>>().join("\n")
}

/// Language named by a `language-xxx` class.
#[must_use]
pub fn language_class(node: &NodeRef<'_>) -> Option<String> {
    let class = dom::node_attribute(node, "class")?;
    class
        .split_whitespace()
        .find_map(|c| c.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty())
        .map(ToString::to_string)
}

/// Fenced code block, wrapped in blank lines.
///
/// The fence grows past any run of its marker found in `code`.
#[must_use]
pub fn fenced_block(code: &str, language: &str, fence: &str) -> String {
    let marker = fence.chars().next().unwrap_or('`');
    let size = fence.chars().count().max(markdown::longest_run(code, marker) + 1);
    let fence = marker.to_string().repeat(size);
    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
}

/// Inline image, or nothing when `src` is blank.
///
/// Backslashes and square brackets in `alt` are escaped.
#[must_use]
pub fn image(alt: &str, src: &str, title: Option<&str>) -> String {
    let src = src.trim();
    if src.is_empty() {
        return String::new();
    }
    format!("![{}]({src}{})", escape_alt(alt), title_part(title))
}

fn escape_alt(alt: &str) -> String {
    let mut escaped = String::with_capacity(alt.len());
    for c in alt.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn inline_link(content: &str, href: &str, title: Option<&str>) -> String {
    let href = href.trim().replace('(', r"\(").replace(')', r"\)");
    format!("[{content}]({href}{})", title_part(title))
}

fn title_part(title: Option<&str>) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!(" \"{}\"", title.replace('"', "\\\"")),
        None => String::new(),
    }
}

fn heading(content: &str, level: usize, style: HeadingStyle) -> String {
    match style {
        HeadingStyle::Setext if level < 3 => {
            let underline = if level == 1 { "=" } else { "-" };
            format!("\n\n{content}\n{}\n\n", underline.repeat(content.chars().count().max(1)))
        }
        _ => format!("\n\n{} {content}\n\n", "#".repeat(level)),
    }
}

/// Wrap inline content in delimiters, keeping flanking whitespace outside.
fn wrap_inline(content: &str, open: &str, close: &str) -> String {
    let inner = content.trim();
    if inner.is_empty() {
        return String::new();
    }
    let lead = &content[..content.len() - content.trim_start().len()];
    let trail = &content[content.trim_end().len()..];
    format!("{lead}{open}{inner}{close}{trail}")
}

fn inline_code(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let code = content.replace(['\r', '\n'], " ");
    let delimiter = "`".repeat(markdown::longest_run(&code, '`') + 1);
    let pad = if code.starts_with('`') || code.ends_with('`') { " " } else { "" };
    format!("{delimiter}{pad}{code}{pad}{delimiter}")
}
