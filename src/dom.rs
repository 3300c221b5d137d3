// src/dom.rs
//! Boundary over the parsed HTML tree.
//!
//! Everything that inspects `scraper::Node` variants lives here so the
//! extraction code only ever sees [`NodeKind`].

use reqwest::Url;
use scraper::{ElementRef, Node};

use crate::utils::collapse_whitespace;

/// Elements whose content is never rendered page text
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line in rendered text
const LINE_BREAKING_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Text(&'a str),
    Element(ElementRef<'a>),
    Comment,
    Other,
}

/// Direct children of `el` in document order
pub fn child_nodes<'a>(el: ElementRef<'a>) -> impl Iterator<Item = NodeKind<'a>> + 'a {
    el.children().map(|node| match node.value() {
        Node::Text(text) => NodeKind::Text(&**text),
        Node::Element(_) => ElementRef::wrap(node).map_or(NodeKind::Other, NodeKind::Element),
        Node::Comment(_) => NodeKind::Comment,
        _ => NodeKind::Other,
    })
}

/// Direct element children of `el`
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}

pub fn tag_name<'a>(el: ElementRef<'a>) -> &'a str {
    el.value().name()
}

pub fn is_skipped(el: ElementRef<'_>) -> bool {
    SKIPPED_TAGS.contains(&tag_name(el))
}

pub fn is_leaf(el: ElementRef<'_>) -> bool {
    child_elements(el).next().is_none()
}

pub fn parent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Whether `node` is `ancestor` itself or sits somewhere beneath it
pub fn contains(ancestor: ElementRef<'_>, node: ElementRef<'_>) -> bool {
    node.id() == ancestor.id() || node.ancestors().any(|a| a.id() == ancestor.id())
}

/// Whether any descendant of `el` has one of the given tag names
pub fn has_descendant_tag(el: ElementRef<'_>, tags: &[&str]) -> bool {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .skip(1)
        .any(|d| tags.contains(&tag_name(d)))
}

/// Approximation of `innerText`: whitespace collapsed inside flow content,
/// newlines at block boundaries, script and style content dropped.
pub fn inner_text(el: ElementRef<'_>) -> String {
    fn walk(el: ElementRef<'_>, out: &mut String) {
        for child in child_nodes(el) {
            match child {
                NodeKind::Text(text) => {
                    for (i, word) in text.split_whitespace().enumerate() {
                        if i > 0 || text.starts_with(char::is_whitespace) {
                            out.push(' ');
                        }
                        out.push_str(word);
                    }
                    if text.ends_with(char::is_whitespace) {
                        out.push(' ');
                    }
                }
                NodeKind::Element(child_el) if is_skipped(child_el) => {}
                NodeKind::Element(child_el) => {
                    let breaks = LINE_BREAKING_TAGS.contains(&tag_name(child_el));
                    if breaks {
                        out.push('\n');
                    }
                    walk(child_el, out);
                    if breaks {
                        out.push('\n');
                    }
                }
                NodeKind::Comment | NodeKind::Other => {}
            }
        }
    }

    let mut out = String::new();
    walk(el, &mut out);
    out
}

/// Rendered text with all whitespace runs collapsed to single spaces
pub fn rendered_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&inner_text(el))
}

pub fn rendered_text_len(el: ElementRef<'_>) -> usize {
    rendered_text(el).chars().count()
}

/// Non-empty rendered lines, each trimmed and whitespace-collapsed
pub fn text_lines(el: ElementRef<'_>) -> Vec<String> {
    inner_text(el)
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Resolve a URL the way a browser resolves `href`/`src` properties.
///
/// Only `http`, `https` and `mailto` targets count as resolvable.
pub fn resolve_url(raw: &str, base: Option<&Url>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let url = match base {
        Some(base) => base.join(raw).ok()?,
        None => Url::parse(raw).ok()?,
    };

    matches!(url.scheme(), "http" | "https" | "mailto").then(|| url.to_string())
}

/// Resolved `href` of a link element, if it has a usable one
pub fn resolve_href(el: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    resolve_url(el.value().attr("href")?, base)
}
