// src/notion/payload.rs
//! JSON bodies for the Notion pages API

use serde_json::{json, Value};

use crate::types::{Block, JobPosting, TextSpan};
use crate::utils::chunk_chars;

/// Notion rejects text objects longer than this
pub const MAX_TEXT_CONTENT_CHARS: usize = 2000;

const DESCRIPTION_HEADING: &str = "About the job";
const DEFAULT_STATUS: &str = "Not started";
const DEFAULT_WORK_TYPE: &str = "On-site";
const UNTITLED_POSITION: &str = "Untitled Job";

/// Rich-text objects for one span, split when the content is too long
pub fn rich_text(span: &TextSpan) -> Vec<Value> {
    chunk_chars(&span.content, MAX_TEXT_CONTENT_CHARS)
        .into_iter()
        .map(|piece| {
            let mut text = json!({ "content": piece });
            if let Some(link) = &span.link {
                text["link"] = json!({ "url": link });
            }
            json!({
                "type": "text",
                "text": text,
                "annotations": {
                    "bold": span.annotations.bold,
                    "italic": span.annotations.italic,
                },
            })
        })
        .collect()
}

pub fn block(block: &Block) -> Value {
    let kind = block.kind().as_str();
    let content: Vec<Value> = block.spans().iter().flat_map(rich_text).collect();

    let mut value = json!({ "object": "block", "type": kind });
    value[kind] = json!({ "rich_text": content });
    value
}

fn plain_rich_text(content: &str) -> Vec<Value> {
    rich_text(&TextSpan::plain(content))
}

fn or_null(url: Option<&str>) -> Value {
    match url {
        Some(url) if !url.is_empty() => json!(url),
        _ => Value::Null,
    }
}

/// Every child block of the page: the section heading, then the description
pub fn page_children(job: &JobPosting) -> Vec<Value> {
    let heading = json!({
        "object": "block",
        "type": "heading_2",
        "heading_2": { "rich_text": plain_rich_text(DESCRIPTION_HEADING) },
    });

    std::iter::once(heading)
        .chain(
            job.description_blocks
                .iter()
                .filter(|b| !b.spans().is_empty())
                .map(block),
        )
        .collect()
}

/// Page creation body without children
pub fn page_properties(job: &JobPosting, database_id: &str) -> Value {
    let position = if job.title.is_empty() {
        UNTITLED_POSITION
    } else {
        job.title.as_str()
    };
    let work_type = if job.work_type.is_empty() {
        DEFAULT_WORK_TYPE
    } else {
        job.work_type.as_str()
    };

    let mut page = json!({
        "parent": { "database_id": database_id },
        "properties": {
            "Company": { "title": plain_rich_text(&job.company) },
            "Position": { "rich_text": plain_rich_text(position) },
            "Status": { "status": { "name": DEFAULT_STATUS } },
            "Location": { "rich_text": plain_rich_text(&job.location) },
            "Work Type": { "select": { "name": work_type } },
            "URL": { "url": or_null(Some(&job.url)) },
            "Contact": { "url": or_null(job.contact_person_url.as_deref()) },
            "Salary": { "rich_text": plain_rich_text(&job.salary) },
        },
    });

    if let Some(logo) = job.company_logo.as_deref().filter(|l| !l.is_empty()) {
        page["icon"] = json!({ "type": "external", "external": { "url": logo } });
    }
    page
}

/// The full create-page body, as it would be sent when everything fits one request
pub fn page_payload(job: &JobPosting, database_id: &str) -> Value {
    let mut page = page_properties(job, database_id);
    page["children"] = Value::Array(page_children(job));
    page
}

/// Split children into request-sized batches, preserving order
pub fn split_children(children: Vec<Value>, max_per_request: usize) -> Vec<Vec<Value>> {
    let size = max_per_request.max(1);
    let mut batches = Vec::new();
    let mut iter = children.into_iter().peekable();

    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(size).collect());
    }
    batches
}
