// src/config.rs
//! Tunable heuristics and service settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_HEADING_PHRASE: &str = "About the job";
pub const DEFAULT_PLACEHOLDER: &str = "No description found.";
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

const DEFAULT_STOP_PHRASES: &[&str] = &[
    "Set alert for similar jobs",
    "See how you compare",
    "Exclusive Job Seeker Insights",
    "About the company",
    "Looking for talent?",
    "Questions?",
    "LinkedIn Corporation",
];

/// Heuristics used by the container locator, classifier and field extractors.
///
/// The size windows and descendant counts were tuned against real job pages;
/// calibrate them against fixtures rather than treating them as fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Exact trimmed text of the leaf element that opens the description
    pub heading_phrase: String,
    /// Ancestors of the heading must have more rendered chars than this...
    pub min_container_text_len: usize,
    /// ...and fewer than this
    pub max_container_text_len: usize,
    pub max_ancestor_depth: usize,
    /// An `article` inside `main` needs more `p`/`li` descendants than this
    pub min_article_blocks: usize,
    /// Candidate `section`/`div` elements need more `p`/`li` descendants than this
    pub min_candidate_blocks: usize,
    pub stop_phrases: Vec<String>,
    pub placeholder_text: String,
    pub min_main_text_len: usize,
    pub hiring_team_phrase: String,
    pub reach_out_phrase: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            heading_phrase: DEFAULT_HEADING_PHRASE.to_string(),
            min_container_text_len: 300,
            max_container_text_len: 15_000,
            max_ancestor_depth: 5,
            min_article_blocks: 2,
            min_candidate_blocks: 3,
            stop_phrases: DEFAULT_STOP_PHRASES.iter().map(|s| s.to_string()).collect(),
            placeholder_text: DEFAULT_PLACEHOLDER.to_string(),
            min_main_text_len: 100,
            hiring_team_phrase: "Meet the hiring team".to_string(),
            reach_out_phrase: "People you can reach out to".to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_heading_phrase(mut self, phrase: &str) -> Self {
        self.heading_phrase = phrase.to_string();
        self
    }

    pub fn with_container_window(mut self, min: usize, max: usize) -> Self {
        self.min_container_text_len = min;
        self.max_container_text_len = max;
        self
    }

    pub fn with_stop_phrases(mut self, phrases: Vec<String>) -> Self {
        self.stop_phrases = phrases;
        self
    }

    pub fn with_placeholder(mut self, text: &str) -> Self {
        self.placeholder_text = text.to_string();
        self
    }

    /// Whether `len` falls strictly inside the description size window
    pub fn accepts_container_len(&self, len: usize) -> bool {
        len > self.min_container_text_len && len < self.max_container_text_len
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub max_wait_ms: u64,
    pub max_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: 10_000,
            max_attempts: 5,
            poll_interval_ms: 1_000,
        }
    }
}

impl ReadinessConfig {
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub api_base_url: String,
    pub api_version: String,
    /// Notion rejects requests carrying more children than this
    pub max_children_per_request: usize,
    pub request_delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            database_id: None,
            api_base_url: DEFAULT_NOTION_API_URL.to_string(),
            api_version: DEFAULT_NOTION_VERSION.to_string(),
            max_children_per_request: 100,
            request_delay_ms: 350,
            timeout_seconds: 30,
        }
    }
}

impl NotionConfig {
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_database_id(mut self, database_id: String) -> Self {
        self.database_id = Some(database_id);
        self
    }

    pub fn with_api_base_url(mut self, url: String) -> Self {
        self.api_base_url = url;
        self
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}
