// src/readiness.rs
//! Re-reads a page until the extractor has enough to produce a posting

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ExtractorConfig, ReadinessConfig};
use crate::extraction::JobExtractor;
use crate::types::{Attempt, JobPosting, NotReadyReason};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub html: String,
    /// URL the page was loaded from, used to resolve links and the job id
    pub url: String,
}

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn snapshot(&self) -> Result<PageSnapshot>;
}

pub struct HttpPageSource {
    client: Client,
    url: String,
}

impl HttpPageSource {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn snapshot(&self) -> Result<PageSnapshot> {
        debug!("Fetching job page: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch job page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let url = response.url().to_string();
        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(PageSnapshot { html, url })
    }
}

/// A saved page on disk, re-read on every snapshot
pub struct FilePageSource {
    path: PathBuf,
    page_url: String,
}

impl FilePageSource {
    pub fn new(path: PathBuf, page_url: Option<String>) -> Self {
        let page_url = page_url.unwrap_or_else(|| format!("file://{}", path.display()));
        Self { path, page_url }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn snapshot(&self) -> Result<PageSnapshot> {
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read file: {}", self.path.display()))?;

        Ok(PageSnapshot {
            html,
            url: self.page_url.clone(),
        })
    }
}

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Timeout: job content did not load after {} seconds", .waited.as_secs_f64())]
    Timeout { waited: Duration },

    #[error("Insufficient data after {attempts} attempts. Title: {title}, Company: {company}")]
    InsufficientData {
        attempts: u32,
        title: String,
        company: String,
    },

    #[error("Failed to load page: {0}")]
    Source(String),
}

pub struct ReadinessPoller<'c> {
    extractor: &'c ExtractorConfig,
    config: ReadinessConfig,
}

impl<'c> ReadinessPoller<'c> {
    pub fn new(extractor: &'c ExtractorConfig, config: ReadinessConfig) -> Self {
        Self { extractor, config }
    }

    /// Attempt extraction until a posting is produced, the attempt budget is
    /// spent, or the overall wait expires
    pub async fn poll<S: PageSource + ?Sized>(&self, source: &S) -> Result<JobPosting, ReadinessError> {
        let max_wait = self.config.max_wait();

        match tokio::time::timeout(max_wait, self.poll_until_ready(source)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Job content did not load within {:?}", max_wait);
                Err(ReadinessError::Timeout { waited: max_wait })
            }
        }
    }

    async fn poll_until_ready<S: PageSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<JobPosting, ReadinessError> {
        let extractor = JobExtractor::new(self.extractor);
        let mut attempts = 0;

        loop {
            let snapshot = source
                .snapshot()
                .await
                .map_err(|e| ReadinessError::Source(format!("{:#}", e)))?;

            // Html is not Send, keep it out of the await points
            let attempt = extractor.attempt_html(&snapshot.html, &snapshot.url);

            match attempt {
                Attempt::Ready(job) => {
                    info!("Job content ready after {} counted attempts", attempts + 1);
                    return Ok(*job);
                }
                Attempt::NotReady(NotReadyReason::PageNotRendered) => {
                    debug!("Page not rendered yet, waiting");
                }
                Attempt::NotReady(NotReadyReason::MissingFields { title, company }) => {
                    attempts += 1;
                    if attempts >= self.config.max_attempts {
                        return Err(ReadinessError::InsufficientData {
                            attempts,
                            title,
                            company,
                        });
                    }
                    warn!(
                        "Attempt {}/{}: title or company missing, retrying",
                        attempts, self.config.max_attempts
                    );
                }
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}
