// src/extraction/mod.rs
//! Page → job posting pipeline.
//!
//! Everything here is synchronous and only reads the parsed document; one
//! call to [`JobExtractor::attempt`] is one extraction attempt.

pub mod classifier;
pub mod fields;
pub mod locator;
pub mod paragraph;
pub mod rich_text;

pub use classifier::{placeholder_block, BlockClassifier};
pub use locator::{ContainerLocator, LocatedContainer, LocatorStrategy};
pub use paragraph::ExtractionState;
pub use rich_text::RichTextExtractor;

use chrono::Utc;
use reqwest::Url;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::config::ExtractorConfig;
use crate::dom;
use crate::types::{Attempt, Block, JobPosting, NotReadyReason};

/// Description blocks for a whole page: locate the container, then classify it
pub fn describe(document: &Html, page_url: Option<&Url>, config: &ExtractorConfig) -> Vec<Block> {
    match ContainerLocator::new(config).locate(document) {
        Some(found) => {
            BlockClassifier::new(config, page_url).classify_from(found.element, found.heading)
        }
        None => {
            warn!("No description container found, using placeholder");
            vec![placeholder_block(config)]
        }
    }
}

pub struct JobExtractor<'c> {
    config: &'c ExtractorConfig,
}

impl<'c> JobExtractor<'c> {
    pub fn new(config: &'c ExtractorConfig) -> Self {
        Self { config }
    }

    /// Parse `html` and attempt an extraction
    pub fn attempt_html(&self, html: &str, page_url: &str) -> Attempt {
        let document = Html::parse_document(html);
        self.attempt(&document, page_url)
    }

    /// One extraction attempt against an already parsed page
    pub fn attempt(&self, document: &Html, page_url: &str) -> Attempt {
        if !fields::is_page_ready(document, self.config) {
            debug!("Page not ready: main content missing or too short");
            return Attempt::NotReady(NotReadyReason::PageNotRendered);
        }

        let Some(main) = fields::main_region(document) else {
            return Attempt::NotReady(NotReadyReason::PageNotRendered);
        };
        let lines = dom::text_lines(main);
        let main_text = dom::rendered_text(main);
        let base = Url::parse(page_url).ok();

        let title = fields::title(document, &lines);
        let company = fields::company(document, &lines);

        if title.is_empty() || company.is_empty() {
            debug!("Missing required fields: title={:?} company={:?}", title, company);
            return Attempt::NotReady(NotReadyReason::MissingFields { title, company });
        }

        let contact = fields::contact(document, base.as_ref(), self.config);
        let description_blocks = describe(document, base.as_ref(), self.config);

        info!(
            "Extracted job: {} at {} ({} description blocks)",
            title,
            company,
            description_blocks.len()
        );

        Attempt::Ready(Box::new(JobPosting {
            url: fields::job_url(page_url),
            location: fields::location(document, &lines),
            work_type: fields::work_type(&main_text),
            salary: fields::salary(&lines),
            company_logo: fields::company_logo(document, base.as_ref()),
            contact_person: contact.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            contact_person_url: contact.map(|c| c.url),
            title,
            company,
            description_blocks,
            scraped_at: Utc::now(),
        }))
    }
}
