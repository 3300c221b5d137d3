// src/notion/types.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of uploading one job posting
#[derive(Debug, Clone, Serialize)]
pub struct SavedPage {
    pub page_id: String,
    pub url: Option<String>,
    pub blocks_sent: usize,
    pub requests: usize,
}
