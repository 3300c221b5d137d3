// src/extraction/locator.rs
//! Finds the element most likely to hold the job description.
//!
//! Strategies run in order and the first hit wins:
//! 1. a leaf whose text is the section heading, widened to the first ancestor
//!    inside the size window (or the heading's parent);
//! 2. an `article` inside `main` with enough paragraphs/list items;
//! 3. the largest `section`/`div` inside `main` with enough paragraphs/list items;
//! 4. `main` itself, then `body`.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::dom;

static HEADING_CANDIDATES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, div, span, strong, b, p").expect("valid selector")
});
static MAIN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").expect("valid selector"));
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article").expect("valid selector"));
static SECTION_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section, div").expect("valid selector"));
static CONTENT_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, li").expect("valid selector"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorStrategy {
    HeadingAncestor,
    HeadingParent,
    Article,
    DenseSection,
    Main,
    Body,
}

#[derive(Debug, Clone, Copy)]
pub struct LocatedContainer<'a> {
    pub element: ElementRef<'a>,
    /// The section heading, when the container was found through it
    pub heading: Option<ElementRef<'a>>,
    pub strategy: LocatorStrategy,
}

pub struct ContainerLocator<'c> {
    config: &'c ExtractorConfig,
}

impl<'c> ContainerLocator<'c> {
    pub fn new(config: &'c ExtractorConfig) -> Self {
        Self { config }
    }

    /// Best-guess description container, or `None` when the document has no body
    pub fn locate<'a>(&self, document: &'a Html) -> Option<LocatedContainer<'a>> {
        let found = self
            .by_heading(document)
            .or_else(|| self.by_article(document))
            .or_else(|| self.by_dense_section(document))
            .or_else(|| self.fallback(document));

        match &found {
            Some(located) => info!(
                "Description container <{}> found via {:?}",
                dom::tag_name(located.element),
                located.strategy
            ),
            None => debug!("No description container in document"),
        }
        found
    }

    /// Leaf elements whose trimmed text is exactly the heading phrase
    pub fn find_heading<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let phrase = self.config.heading_phrase.trim();
        if phrase.is_empty() {
            return None;
        }
        document
            .select(&HEADING_CANDIDATES)
            .find(|el| dom::is_leaf(*el) && dom::rendered_text(*el) == phrase)
    }

    fn by_heading<'a>(&self, document: &'a Html) -> Option<LocatedContainer<'a>> {
        let heading = self.find_heading(document)?;

        let mut current = dom::parent_element(heading);
        let mut depth = 0;

        while let Some(candidate) = current {
            if depth >= self.config.max_ancestor_depth || is_document_root(candidate) {
                break;
            }

            let len = dom::rendered_text_len(candidate);
            debug!("Heading ancestor <{}> at depth {} has {} chars", dom::tag_name(candidate), depth, len);

            if self.config.accepts_container_len(len) {
                return Some(LocatedContainer {
                    element: candidate,
                    heading: Some(heading),
                    strategy: LocatorStrategy::HeadingAncestor,
                });
            }

            current = dom::parent_element(candidate);
            depth += 1;
        }

        Some(LocatedContainer {
            element: dom::parent_element(heading).unwrap_or(heading),
            heading: Some(heading),
            strategy: LocatorStrategy::HeadingParent,
        })
    }

    fn by_article<'a>(&self, document: &'a Html) -> Option<LocatedContainer<'a>> {
        let main = document.select(&MAIN).next()?;
        main.select(&ARTICLE)
            .find(|article| article.select(&CONTENT_BLOCKS).count() > self.config.min_article_blocks)
            .map(|element| LocatedContainer {
                element,
                heading: None,
                strategy: LocatorStrategy::Article,
            })
    }

    fn by_dense_section<'a>(&self, document: &'a Html) -> Option<LocatedContainer<'a>> {
        let main = document.select(&MAIN).next()?;
        main.select(&SECTION_CANDIDATES)
            .filter(|el| el.select(&CONTENT_BLOCKS).count() > self.config.min_candidate_blocks)
            .map(|el| (dom::rendered_text_len(el), el))
            .max_by_key(|(len, _)| *len)
            .map(|(_, element)| LocatedContainer {
                element,
                heading: None,
                strategy: LocatorStrategy::DenseSection,
            })
    }

    fn fallback<'a>(&self, document: &'a Html) -> Option<LocatedContainer<'a>> {
        if let Some(main) = document.select(&MAIN).next() {
            return Some(LocatedContainer {
                element: main,
                heading: None,
                strategy: LocatorStrategy::Main,
            });
        }
        document.select(&BODY).next().map(|body| LocatedContainer {
            element: body,
            heading: None,
            strategy: LocatorStrategy::Body,
        })
    }
}

fn is_document_root(el: ElementRef<'_>) -> bool {
    matches!(dom::tag_name(el), "body" | "html")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(count: usize) -> String {
        vec!["lorem"; count].join(" ")
    }

    fn locate(html: &str) -> (Html, Option<(String, LocatorStrategy)>) {
        let doc = Html::parse_document(html);
        let config = ExtractorConfig::default();
        let result = ContainerLocator::new(&config)
            .locate(&doc)
            .map(|found| {
                let id = found.element.value().attr("id").unwrap_or_default().to_string();
                (id, found.strategy)
            });
        (doc, result)
    }

    #[test]
    fn test_heading_walks_to_first_ancestor_in_window() {
        // level1 is too small, level2 fits, level3 would fit as well
        let html = format!(
            "<html><body><div id=\"level3\">{}<div id=\"level2\">{}<div id=\"level1\">\
             <h2>About the job</h2><p>Short.</p></div></div></div></body></html>",
            words(100),
            words(100)
        );
        let (_doc, found) = locate(&html);
        assert_eq!(found, Some(("level2".to_string(), LocatorStrategy::HeadingAncestor)));
    }

    #[test]
    fn test_heading_with_oversized_ancestors_uses_parent() {
        let html = format!(
            "<html><body><div id=\"outer\">{}<div id=\"inner\"><span>About the job</span></div></div></body></html>",
            words(4000)
        );
        let (_doc, found) = locate(&html);
        assert_eq!(found, Some(("inner".to_string(), LocatorStrategy::HeadingParent)));
    }

    #[test]
    fn test_heading_must_be_exact_leaf() {
        let html = "<html><body><main id=\"main\"><div>About the job openings</div>\
                    <div><span>About the job</span> and more</div></main></body></html>";
        let doc = Html::parse_document(html);
        let config = ExtractorConfig::default();
        let heading = ContainerLocator::new(&config).find_heading(&doc).unwrap();
        assert_eq!(dom::tag_name(heading), "span");
    }

    #[test]
    fn test_configured_heading_phrase() {
        let html = "<html><body><div id=\"box\"><h3>Job description</h3><p>Details</p></div></body></html>";
        let doc = Html::parse_document(html);
        let config = ExtractorConfig::default().with_heading_phrase("Job description");

        let found = ContainerLocator::new(&config).locate(&doc).unwrap();
        assert_eq!(found.strategy, LocatorStrategy::HeadingParent);
        assert_eq!(found.element.value().attr("id"), Some("box"));
        assert_eq!(found.heading.map(dom::tag_name), Some("h3"));
    }

    #[test]
    fn test_article_needs_enough_blocks() {
        let html = "<html><body><main id=\"main\"><article id=\"a\"><p>1</p><p>2</p><p>3</p></article></main></body></html>";
        let (_doc, found) = locate(html);
        assert_eq!(found, Some(("a".to_string(), LocatorStrategy::Article)));

        let sparse = "<html><body><main id=\"main\"><article id=\"a\"><p>1</p><p>2</p></article></main></body></html>";
        let (_doc, found) = locate(sparse);
        assert_eq!(found, Some(("main".to_string(), LocatorStrategy::Main)));
    }

    #[test]
    fn test_dense_section_prefers_most_text() {
        let html = format!(
            "<html><body><main id=\"main\">\
             <section id=\"small\"><p>a</p><p>b</p><p>c</p><p>d</p></section>\
             <section id=\"big\"><p>{}</p><p>b</p><li>c</li><li>d</li></section>\
             </main></body></html>",
            words(50)
        );
        let (_doc, found) = locate(&html);
        assert_eq!(found, Some(("big".to_string(), LocatorStrategy::DenseSection)));
    }

    #[test]
    fn test_falls_back_to_body() {
        let (_doc, found) = locate("<html><body id=\"body\"><div>nothing here</div></body></html>");
        assert_eq!(found, Some(("body".to_string(), LocatorStrategy::Body)));
    }

    #[test]
    fn test_fragment_without_body_finds_nothing() {
        let doc = Html::parse_fragment("<div>loose</div>");
        let config = ExtractorConfig::default();
        assert!(ContainerLocator::new(&config).locate(&doc).is_none());
    }
}
