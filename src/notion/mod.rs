// src/notion/mod.rs
pub mod client;
pub mod payload;
pub mod types;

pub use client::NotionClient;
pub use payload::{page_payload, split_children};
pub use types::{PageResponse, SavedPage};
