// src/extraction/rich_text.rs
//! Inline content of an element as annotated spans and hard breaks

use reqwest::Url;
use scraper::ElementRef;

use crate::dom::{self, NodeKind};
use crate::types::{InlineItem, TextSpan};

/// Block-shaped tags flattened to plain inline content below the classifier's top level
const FLATTENED_TAGS: &[&str] = &["p", "ul", "ol", "li"];

#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextExtractor<'u> {
    base_url: Option<&'u Url>,
}

impl<'u> RichTextExtractor<'u> {
    pub fn new(base_url: Option<&'u Url>) -> Self {
        Self { base_url }
    }

    /// Inline items of `node`'s children in document order.
    ///
    /// Inside a list item a `br` becomes a single space so the item stays one block.
    pub fn extract(&self, node: ElementRef<'_>, inside_list_item: bool) -> Vec<InlineItem> {
        let mut items = Vec::new();

        for child in dom::child_nodes(node) {
            match child {
                NodeKind::Text(text) => {
                    if !text.is_empty() {
                        items.push(InlineItem::Span(TextSpan::plain(text)));
                    }
                }
                NodeKind::Element(el) => self.extract_element(el, inside_list_item, &mut items),
                NodeKind::Comment | NodeKind::Other => {}
            }
        }

        items
    }

    /// Like [`extract`](Self::extract), but `el`'s own formatting and link apply too
    pub fn extract_self(&self, el: ElementRef<'_>, inside_list_item: bool) -> Vec<InlineItem> {
        let mut items = Vec::new();
        self.extract_element(el, inside_list_item, &mut items);
        items
    }

    fn extract_element(&self, el: ElementRef<'_>, inside_list_item: bool, items: &mut Vec<InlineItem>) {
        if dom::is_skipped(el) {
            return;
        }

        let tag = dom::tag_name(el);

        if tag == "br" {
            items.push(if inside_list_item {
                InlineItem::Span(TextSpan::space())
            } else {
                InlineItem::Break
            });
            return;
        }

        let nested = self.extract(el, inside_list_item);

        if FLATTENED_TAGS.contains(&tag) {
            items.extend(nested);
            return;
        }

        let bold = matches!(tag, "strong" | "b");
        let italic = matches!(tag, "em" | "i");
        let link = if tag == "a" {
            dom::resolve_href(el, self.base_url)
        } else {
            None
        };

        items.extend(nested.into_iter().map(|item| match item {
            InlineItem::Span(mut span) => {
                span.annotations.bold |= bold;
                span.annotations.italic |= italic;
                if let Some(url) = &link {
                    span.link = Some(url.clone());
                }
                InlineItem::Span(span)
            }
            InlineItem::Break => InlineItem::Break,
        }));
    }
}

/// Drop break markers, keeping spans in order
pub fn spans_only(items: Vec<InlineItem>) -> Vec<TextSpan> {
    items.into_iter().filter_map(InlineItem::into_span).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn extract(html: &str, inside_list_item: bool) -> Vec<InlineItem> {
        let doc = Html::parse_fragment(&format!("<div id=\"root\">{}</div>", html));
        let selector = Selector::parse("#root").unwrap();
        let root = doc.select(&selector).next().unwrap();
        RichTextExtractor::default().extract(root, inside_list_item)
    }

    fn span(item: &InlineItem) -> &TextSpan {
        match item {
            InlineItem::Span(span) => span,
            InlineItem::Break => panic!("expected span, got break"),
        }
    }

    #[test]
    fn test_raw_text_is_not_trimmed() {
        let items = extract("  Hello  ", false);
        assert_eq!(items, vec![InlineItem::Span(TextSpan::plain("  Hello  "))]);
    }

    #[test]
    fn test_bold_and_italic_nest() {
        let items = extract("<strong>a <em>b</em></strong><i>c</i>", false);
        assert_eq!(items.len(), 3);
        assert_eq!(span(&items[0]), &TextSpan::plain("a ").bold());
        assert_eq!(span(&items[1]), &TextSpan::plain("b").bold().italic());
        assert_eq!(span(&items[2]), &TextSpan::plain("c").italic());
    }

    #[test]
    fn test_links_require_resolvable_target() {
        let items = extract(
            "<a href=\"https://example.com/apply\"><b>Apply</b></a><a>none</a><a href=\"/relative\">rel</a>",
            false,
        );
        assert_eq!(
            span(&items[0]),
            &TextSpan::plain("Apply").bold().with_link("https://example.com/apply")
        );
        assert_eq!(span(&items[1]).link, None);
        assert_eq!(span(&items[2]).link, None);
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let doc = Html::parse_fragment("<div id=\"root\"><a href=\"/in/jane\">Jane</a></div>");
        let selector = Selector::parse("#root").unwrap();
        let root = doc.select(&selector).next().unwrap();
        let base = Url::parse("https://www.linkedin.com/jobs/view/1/").unwrap();

        let items = RichTextExtractor::new(Some(&base)).extract(root, false);
        assert_eq!(span(&items[0]).link.as_deref(), Some("https://www.linkedin.com/in/jane"));
    }

    #[test]
    fn test_break_depends_on_list_context() {
        let top = extract("A<br>B", false);
        assert_eq!(top[1], InlineItem::Break);

        let in_list = extract("A<br>B", true);
        assert_eq!(in_list[1], InlineItem::Span(TextSpan::space()));
        assert!(!in_list.iter().any(InlineItem::is_break));
    }

    #[test]
    fn test_formatting_skips_breaks() {
        let items = extract("<b>A<br>B</b>", false);
        assert_eq!(items.len(), 3);
        assert!(span(&items[0]).annotations.bold);
        assert!(items[1].is_break());
        assert!(span(&items[2]).annotations.bold);
    }

    #[test]
    fn test_block_tags_flatten_inline() {
        let items = extract("<p>one</p><ul><li>two</li></ul><span>three</span>", false);
        let text: Vec<_> = spans_only(items).into_iter().map(|s| s.content).collect();
        assert_eq!(text, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_scripts_and_comments_ignored() {
        let items = extract("a<!-- c --><script>x()</script><style>p{}</style>b", false);
        let text: Vec<_> = spans_only(items).into_iter().map(|s| s.content).collect();
        assert_eq!(text, vec!["a", "b"]);
    }

    #[test]
    fn test_extract_self_applies_own_formatting() {
        let doc = Html::parse_fragment("<strong id=\"root\">Requirements <i>now</i></strong>");
        let selector = Selector::parse("#root").unwrap();
        let root = doc.select(&selector).next().unwrap();
        let extractor = RichTextExtractor::default();

        let items = extractor.extract_self(root, false);
        assert_eq!(span(&items[0]), &TextSpan::plain("Requirements ").bold());
        assert_eq!(span(&items[1]), &TextSpan::plain("now").bold().italic());

        let children_only = extractor.extract(root, false);
        assert!(!span(&children_only[0]).annotations.bold);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let doc = Html::parse_fragment("<div id=\"root\"><b>x</b> y<br>z</div>");
        let selector = Selector::parse("#root").unwrap();
        let root = doc.select(&selector).next().unwrap();
        let extractor = RichTextExtractor::default();
        assert_eq!(extractor.extract(root, false), extractor.extract(root, false));
    }
}
