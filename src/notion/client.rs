// src/notion/client.rs
//! Notion pages API client - creates one page per job posting

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info};

use super::payload;
use super::types::{ErrorResponse, PageResponse, SavedPage};
use crate::config::NotionConfig;
use crate::types::JobPosting;

const PAGES_ENDPOINT: &str = "/pages";

pub struct NotionClient {
    client: reqwest::Client,
    config: NotionConfig,
    token: String,
    database_id: String,
}

impl NotionClient {
    /// Create a client; token and database id must both be configured
    pub fn new(config: NotionConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .context("Notion token is not configured (set NOTION_TOKEN)")?;
        let database_id = config
            .database_id
            .clone()
            .context("Notion database id is not configured (set NOTION_DATABASE_ID)")?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config,
            token,
            database_id,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.config.api_version)
    }

    /// Create the page for `job`, then append any children that did not fit
    pub async fn save_job(&self, job: &JobPosting) -> Result<SavedPage> {
        let children = payload::page_children(job);
        let blocks_sent = children.len();
        let mut batches =
            payload::split_children(children, self.config.max_children_per_request).into_iter();

        let mut body = payload::page_properties(job, &self.database_id);
        body["children"] = Value::Array(batches.next().unwrap_or_default());

        let page = self.create_page(&body).await?;
        let mut requests = 1;

        for batch in batches {
            tokio::time::sleep(self.config.request_delay()).await;
            self.append_children(&page.id, batch).await?;
            requests += 1;
        }

        info!(
            "Saved {} at {} to Notion page {} ({} blocks, {} requests)",
            job.title, job.company, page.id, blocks_sent, requests
        );

        Ok(SavedPage {
            page_id: page.id,
            url: page.url,
            blocks_sent,
            requests,
        })
    }

    pub async fn create_page(&self, body: &Value) -> Result<PageResponse> {
        let url = self.url(PAGES_ENDPOINT);
        info!("Creating Notion page: {}", url);

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(body)
            .send()
            .await
            .context("Failed to call Notion pages API")?;

        let response = check_status(response, "Failed to save to Notion").await?;
        response
            .json()
            .await
            .context("Failed to parse Notion page response")
    }

    pub async fn append_children(&self, block_id: &str, children: Vec<Value>) -> Result<()> {
        let url = self.url(&format!("/blocks/{}/children", block_id));
        debug!("Appending {} blocks to {}", children.len(), block_id);

        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&serde_json::json!({ "children": children }))
            .send()
            .await
            .context("Failed to call Notion blocks API")?;

        check_status(response, "Failed to append blocks to Notion page").await?;
        Ok(())
    }
}

async fn check_status(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error!("Notion error response ({}): {}", status, error_text);

    anyhow::bail!("{}", error_message(status, &error_text, fallback))
}

/// The API's own `message` when the body carries one
fn error_message(status: StatusCode, body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            message: Some(message),
            code,
        }) => match code {
            Some(code) => format!("{} ({}, {})", message, status, code),
            None => format!("{} ({})", message, status),
        },
        _ => format!("{} ({})", fallback, status),
    }
}
