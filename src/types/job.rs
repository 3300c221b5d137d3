// src/types/job.rs
//! Job posting as captured from a single page

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::blocks::{Block, BlockKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_type: String,
    pub salary: String,
    pub company_logo: Option<String>,
    pub contact_person: String,
    pub contact_person_url: Option<String>,
    pub description_blocks: Vec<Block>,
    pub scraped_at: DateTime<Utc>,
}

impl JobPosting {
    /// Plain-text rendering of the description, one block per line
    pub fn description_text(&self) -> String {
        let mut numbered = 0;
        self.description_blocks
            .iter()
            .map(|block| {
                let text = block.plain_text().trim().to_string();
                match block.kind() {
                    BlockKind::Paragraph => {
                        numbered = 0;
                        text
                    }
                    BlockKind::BulletedListItem => {
                        numbered = 0;
                        format!("- {}", text)
                    }
                    BlockKind::NumberedListItem => {
                        numbered += 1;
                        format!("{}. {}", numbered, text)
                    }
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Why an attempt produced no posting yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotReadyReason {
    /// The main content region is missing or still nearly empty
    PageNotRendered,
    /// The page rendered but title or company could not be found
    MissingFields { title: String, company: String },
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageNotRendered => write!(f, "main content not rendered yet"),
            Self::MissingFields { title, company } => {
                write!(f, "missing required fields (title: {:?}, company: {:?})", title, company)
            }
        }
    }
}

/// Outcome of one "attempt extraction now" call
#[derive(Debug, Clone)]
pub enum Attempt {
    Ready(Box<JobPosting>),
    NotReady(NotReadyReason),
}

impl Attempt {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
