pub mod config;
pub mod dom;
pub mod environment;
pub mod extraction;
pub mod notion;
pub mod readiness;
pub mod types;
pub mod utils;

use anyhow::Result;
use std::path::PathBuf;

use environment::AppConfig;
use readiness::{FilePageSource, HttpPageSource, PageSource, ReadinessPoller};
use types::JobPosting;

/// Page source for a CLI argument: an http(s) URL or a saved HTML file
pub fn page_source(source: &str, page_url: Option<String>) -> Result<Box<dyn PageSource>> {
    if utils::is_http_url(source) {
        Ok(Box::new(HttpPageSource::new(source)?))
    } else {
        Ok(Box::new(FilePageSource::new(PathBuf::from(source), page_url)))
    }
}

/// Convenience function: load the page and wait until a posting can be extracted
pub async fn extract_job(source: &str, page_url: Option<String>, config: &AppConfig) -> Result<JobPosting> {
    let source = page_source(source, page_url)?;
    let poller = ReadinessPoller::new(&config.extractor, config.readiness.clone());
    Ok(poller.poll(source.as_ref()).await?)
}
