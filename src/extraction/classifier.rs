// src/extraction/classifier.rs
//! Walks a description container and emits paragraph and list-item blocks

use reqwest::Url;
use scraper::ElementRef;
use tracing::debug;

use super::paragraph::{clean_spans, has_meaningful_content, ExtractionState};
use super::rich_text::{spans_only, RichTextExtractor};
use crate::config::ExtractorConfig;
use crate::dom::{self, NodeKind};
use crate::types::{Block, BlockKind, InlineItem, TextSpan};

/// Generic block containers that are transparent for block boundaries
const WRAPPER_TAGS: &[&str] = &[
    "div", "section", "article", "header", "footer", "main", "aside", "nav", "span",
];

/// Descendants that turn a `p` into a wrapper instead of a single paragraph
const PARAGRAPH_SPLITTING_TAGS: &[&str] = &["br", "ul", "ol"];

/// What one DOM child means to the block walk
#[derive(Debug, Clone, Copy)]
enum NodeClass<'a> {
    Ignored,
    Whitespace,
    Text(&'a str),
    HardBreak,
    Container(ElementRef<'a>),
    /// A `p` holding breaks or lists: its own block boundary, split inside
    SplitParagraph(ElementRef<'a>),
    List(ElementRef<'a>, BlockKind),
    Paragraph(ElementRef<'a>),
    Inline(ElementRef<'a>),
}

fn classify_node(node: NodeKind<'_>) -> NodeClass<'_> {
    match node {
        NodeKind::Comment | NodeKind::Other => NodeClass::Ignored,
        NodeKind::Text(text) if text.trim().is_empty() => NodeClass::Whitespace,
        NodeKind::Text(text) => NodeClass::Text(text),
        NodeKind::Element(el) => classify_element(el),
    }
}

fn classify_element(el: ElementRef<'_>) -> NodeClass<'_> {
    if dom::is_skipped(el) {
        return NodeClass::Ignored;
    }

    match dom::tag_name(el) {
        "br" => NodeClass::HardBreak,
        "ul" => NodeClass::List(el, BlockKind::BulletedListItem),
        "ol" => NodeClass::List(el, BlockKind::NumberedListItem),
        "p" if dom::has_descendant_tag(el, PARAGRAPH_SPLITTING_TAGS) => NodeClass::SplitParagraph(el),
        "p" => NodeClass::Paragraph(el),
        "span" => match sole_paragraph_child(el) {
            Some(p) => NodeClass::Paragraph(p),
            None => NodeClass::Container(el),
        },
        tag if WRAPPER_TAGS.contains(&tag) => NodeClass::Container(el),
        _ => NodeClass::Inline(el),
    }
}

/// The `p` of a `span > p` wrapper with nothing else visible beside it
fn sole_paragraph_child(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut found = None;
    for child in dom::child_nodes(el) {
        match child {
            NodeKind::Text(text) if !text.trim().is_empty() => return None,
            NodeKind::Element(child_el) => {
                if found.is_some() || dom::tag_name(child_el) != "p" {
                    return None;
                }
                found = Some(child_el);
            }
            _ => {}
        }
    }
    found.filter(|p| !dom::has_descendant_tag(*p, PARAGRAPH_SPLITTING_TAGS))
}

/// Fixed block substituted when a walk yields nothing
pub fn placeholder_block(config: &ExtractorConfig) -> Block {
    Block::Paragraph {
        spans: vec![TextSpan::plain(config.placeholder_text.as_str())],
    }
}

/// Mutable state of one walk. Dropped when the walk ends.
struct Walk<'a> {
    state: ExtractionState,
    blocks: Vec<Block>,
    start: Option<ElementRef<'a>>,
}

pub struct BlockClassifier<'c, 'u> {
    config: &'c ExtractorConfig,
    inline: RichTextExtractor<'u>,
}

impl<'c, 'u> BlockClassifier<'c, 'u> {
    pub fn new(config: &'c ExtractorConfig, base_url: Option<&'u Url>) -> Self {
        Self {
            config,
            inline: RichTextExtractor::new(base_url),
        }
    }

    /// Blocks for the whole container, or the placeholder when it has none
    pub fn classify(&self, container: ElementRef<'_>) -> Vec<Block> {
        self.classify_from(container, None)
    }

    /// Blocks for the content that follows `start` (the section heading) inside `container`.
    ///
    /// A `start` outside the container is ignored.
    pub fn classify_from<'a>(
        &self,
        container: ElementRef<'a>,
        start: Option<ElementRef<'a>>,
    ) -> Vec<Block> {
        let start = start.filter(|heading| dom::contains(container, *heading));
        let mut walk = Walk {
            state: ExtractionState::new(),
            blocks: Vec::new(),
            start,
        };

        self.walk_children(container, &mut walk);
        walk.state.finalize(&mut walk.blocks);

        debug!(
            "Classified <{}> into {} blocks",
            dom::tag_name(container),
            walk.blocks.len()
        );

        if walk.blocks.is_empty() {
            return vec![placeholder_block(self.config)];
        }
        walk.blocks
    }

    fn walk_children<'a>(&self, el: ElementRef<'a>, walk: &mut Walk<'a>) {
        for child in dom::child_nodes(el) {
            self.visit(child, walk);
        }
    }

    fn visit<'a>(&self, node: NodeKind<'a>, walk: &mut Walk<'a>) {
        if let Some(start) = walk.start {
            // Before the heading only its ancestors are entered, and nothing is emitted
            if let NodeKind::Element(el) = node {
                if el.id() == start.id() {
                    walk.start = None;
                } else if dom::contains(el, start) {
                    self.walk_children(el, walk);
                }
            }
            return;
        }

        if let NodeKind::Element(el) = node {
            if self.hits_stop_phrase(el) {
                debug!("Stopping at <{}> section", dom::tag_name(el));
                return;
            }
        }

        match classify_node(node) {
            NodeClass::Ignored => {}
            NodeClass::Whitespace => walk.state.mark_space(),
            NodeClass::Text(text) => walk.state.push_text(text),
            NodeClass::HardBreak => walk.state.finalize(&mut walk.blocks),
            NodeClass::Container(el) => self.walk_children(el, walk),
            NodeClass::SplitParagraph(el) => {
                walk.state.finalize(&mut walk.blocks);
                self.walk_children(el, walk);
                walk.state.finalize(&mut walk.blocks);
            }
            NodeClass::List(el, kind) => self.emit_list(el, kind, walk),
            NodeClass::Paragraph(el) => self.emit_paragraph(el, walk),
            NodeClass::Inline(el) => self.merge_inline(el, walk),
        }
    }

    fn emit_list(&self, list: ElementRef<'_>, kind: BlockKind, walk: &mut Walk<'_>) {
        walk.state.finalize(&mut walk.blocks);

        for item in dom::child_elements(list).filter(|el| dom::tag_name(*el) == "li") {
            let spans = clean_spans(spans_only(self.inline.extract(item, true)));
            if has_meaningful_content(&spans) {
                walk.blocks.push(Block::new(kind, spans));
            }
        }

        walk.state.reset();
    }

    fn emit_paragraph(&self, paragraph: ElementRef<'_>, walk: &mut Walk<'_>) {
        walk.state.finalize(&mut walk.blocks);

        let spans = clean_spans(spans_only(self.inline.extract(paragraph, false)));
        if has_meaningful_content(&spans) {
            walk.blocks.push(Block::Paragraph { spans });
        }

        walk.state.reset();
    }

    /// Append inline content to the open paragraph. Only the first hard break
    /// splits; content after later breaks stays in the new paragraph.
    fn merge_inline(&self, el: ElementRef<'_>, walk: &mut Walk<'_>) {
        walk.state.push_space_if_pending();

        let mut items = self.inline.extract_self(el, false);
        match items.iter().position(InlineItem::is_break) {
            Some(index) => {
                let rest = items.split_off(index + 1);
                items.truncate(index);
                walk.state.extend(spans_only(items));
                walk.state.finalize(&mut walk.blocks);
                walk.state.extend(spans_only(rest));
            }
            None => walk.state.extend(spans_only(items)),
        }
    }

    fn hits_stop_phrase(&self, el: ElementRef<'_>) -> bool {
        if self.config.stop_phrases.is_empty() {
            return false;
        }
        let text = dom::rendered_text(el);
        self.config
            .stop_phrases
            .iter()
            .any(|phrase| !phrase.is_empty() && text.starts_with(phrase.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn classify_with(html: &str, config: &ExtractorConfig) -> Vec<Block> {
        let doc = Html::parse_fragment(&format!("<div id=\"root\">{}</div>", html));
        let selector = Selector::parse("#root").unwrap();
        let root = doc.select(&selector).next().unwrap();
        BlockClassifier::new(config, None).classify(root)
    }

    fn classify(html: &str) -> Vec<Block> {
        classify_with(html, &ExtractorConfig::default())
    }

    fn texts(blocks: &[Block]) -> Vec<String> {
        blocks.iter().map(Block::plain_text).collect()
    }

    #[test]
    fn test_empty_container_yields_placeholder() {
        let blocks = classify("<div>  <span> </span><!-- nothing --></div>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![TextSpan::plain("No description found.")]
            }]
        );
    }

    #[test]
    fn test_custom_placeholder() {
        let config = ExtractorConfig::default().with_placeholder("Nothing here");
        assert_eq!(
            classify_with("<div><!-- empty --></div>", &config),
            vec![Block::Paragraph {
                spans: vec![TextSpan::plain("Nothing here")]
            }]
        );
    }

    #[test]
    fn test_paragraph_keeps_inline_formatting() {
        let blocks = classify("<p>Hello <b>world</b></p>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![TextSpan::plain("Hello "), TextSpan::plain("world").bold()]
            }]
        );
    }

    #[test]
    fn test_double_break_separates_paragraphs() {
        let blocks = classify("<p>A<br><br>B</p>");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    spans: vec![TextSpan::plain("A")]
                },
                Block::Paragraph {
                    spans: vec![TextSpan::plain("B")]
                },
            ]
        );
    }

    #[test]
    fn test_split_paragraph_keeps_outside_text_apart() {
        let blocks = classify("intro<p>Line one<br>Line two</p>tail");
        assert_eq!(texts(&blocks), vec!["intro", "Line one", "Line two", "tail"]);

        let blocks = classify("<b>Perks:</b><p>Free lunch<br>Gym</p>");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    spans: vec![TextSpan::plain("Perks:").bold()]
                },
                Block::Paragraph {
                    spans: vec![TextSpan::plain("Free lunch")]
                },
                Block::Paragraph {
                    spans: vec![TextSpan::plain("Gym")]
                },
            ]
        );
    }

    #[test]
    fn test_leading_whitespace_never_becomes_a_space() {
        let blocks = classify("\n<b>A</b><i>B</i>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![TextSpan::plain("A").bold(), TextSpan::plain("B").italic()]
            }]
        );
    }

    #[test]
    fn test_single_top_level_break_splits() {
        let blocks = classify("First line<br>Second line");
        assert_eq!(texts(&blocks), vec!["First line", "Second line"]);
    }

    #[test]
    fn test_whitespace_only_list_item_dropped() {
        let blocks = classify("<ul><li>One</li><li>  </li><li>Two</li></ul>");
        assert_eq!(
            blocks,
            vec![
                Block::BulletItem {
                    spans: vec![TextSpan::plain("One")]
                },
                Block::BulletItem {
                    spans: vec![TextSpan::plain("Two")]
                },
            ]
        );
    }

    #[test]
    fn test_single_space_list_item_dropped() {
        let blocks = classify("<ol><li> </li><li>Ship it</li></ol>");
        assert_eq!(
            blocks,
            vec![Block::NumberedItem {
                spans: vec![TextSpan::plain("Ship it")]
            }]
        );
    }

    #[test]
    fn test_list_item_breaks_become_spaces() {
        let blocks = classify("<ol><li>Design<br>and <em>build</em></li></ol>");
        assert_eq!(
            blocks,
            vec![Block::NumberedItem {
                spans: vec![
                    TextSpan::plain("Design"),
                    TextSpan::space(),
                    TextSpan::plain("and "),
                    TextSpan::plain("build").italic(),
                ]
            }]
        );
    }

    #[test]
    fn test_list_finalizes_open_paragraph() {
        let blocks = classify("<strong>Requirements:</strong><ul><li>Rust</li></ul>tail");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    spans: vec![TextSpan::plain("Requirements:").bold()]
                },
                Block::BulletItem {
                    spans: vec![TextSpan::plain("Rust")]
                },
                Block::Paragraph {
                    spans: vec![TextSpan::plain("tail")]
                },
            ]
        );
    }

    #[test]
    fn test_whitespace_merge_between_text_nodes() {
        let blocks = classify("Senior<!-- a -->\n  <!-- b -->Engineer");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![
                    TextSpan::plain("Senior"),
                    TextSpan::space(),
                    TextSpan::plain("Engineer"),
                ]
            }]
        );
    }

    #[test]
    fn test_wrappers_are_transparent() {
        let blocks = classify("<div><section>We are <span>hiring</span></section></div> <b>now</b>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![
                    TextSpan::plain("We are "),
                    TextSpan::plain("hiring"),
                    TextSpan::space(),
                    TextSpan::plain("now").bold(),
                ]
            }]
        );
    }

    #[test]
    fn test_paragraph_element_starts_own_block() {
        let blocks = classify("intro<p>body</p><span><p>wrapped</p></span>");
        assert_eq!(texts(&blocks), vec!["intro", "body", "wrapped"]);
    }

    #[test]
    fn test_inline_split_at_first_break_only() {
        let blocks = classify("<b>one<br>two<br>three</b>");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    spans: vec![TextSpan::plain("one").bold()]
                },
                Block::Paragraph {
                    spans: vec![TextSpan::plain("two").bold(), TextSpan::plain("three").bold()]
                },
            ]
        );
    }

    #[test]
    fn test_unknown_elements_merge_inline() {
        let blocks = classify("<h3>Perks</h3> <custom-tag>Free <a href=\"https://x.dev/\">lunch</a></custom-tag>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![
                    TextSpan::plain("Perks"),
                    TextSpan::space(),
                    TextSpan::plain("Free "),
                    TextSpan::plain("lunch").with_link("https://x.dev/"),
                ]
            }]
        );
    }

    #[test]
    fn test_stop_phrase_cuts_section() {
        let blocks = classify("<p>Build things.</p><div><h2>About the company</h2><p>Acme makes anvils.</p></div>");
        assert_eq!(texts(&blocks), vec!["Build things."]);

        let no_stops = ExtractorConfig::default().with_stop_phrases(Vec::new());
        let blocks = classify_with(
            "<p>Build things.</p><div><h2>About the company</h2><p>Acme makes anvils.</p></div>",
            &no_stops,
        );
        assert_eq!(
            texts(&blocks),
            vec!["Build things.", "About the company", "Acme makes anvils."]
        );
    }

    #[test]
    fn test_start_anchor_skips_preceding_content() {
        let doc = Html::parse_fragment(
            "<div id=\"root\"><div>Top card noise</div><div><h2>About the job</h2>Role <b>summary</b></div><p>Details</p></div>",
        );
        let root = doc.select(&Selector::parse("#root").unwrap()).next().unwrap();
        let heading = doc.select(&Selector::parse("h2").unwrap()).next().unwrap();
        let config = ExtractorConfig::default();

        let blocks = BlockClassifier::new(&config, None).classify_from(root, Some(heading));
        assert_eq!(texts(&blocks), vec!["Role summary", "Details"]);
    }

    #[test]
    fn test_start_anchor_outside_container_is_ignored() {
        let doc = Html::parse_fragment("<h2>About the job</h2><div id=\"root\"><p>Body</p></div>");
        let root = doc.select(&Selector::parse("#root").unwrap()).next().unwrap();
        let heading = doc.select(&Selector::parse("h2").unwrap()).next().unwrap();
        let config = ExtractorConfig::default();

        let blocks = BlockClassifier::new(&config, None).classify_from(root, Some(heading));
        assert_eq!(texts(&blocks), vec!["Body"]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let doc = Html::parse_fragment(
            "<div id=\"root\">Lead <i>teams</i><br><ul><li>Go</li></ul><p>End</p></div>",
        );
        let root = doc.select(&Selector::parse("#root").unwrap()).next().unwrap();
        let config = ExtractorConfig::default();
        let classifier = BlockClassifier::new(&config, None);

        assert_eq!(classifier.classify(root), classifier.classify(root));
    }
}
