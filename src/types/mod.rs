// src/types/mod.rs
//! Data model shared by the extraction pipeline and the upload client

pub mod blocks;
pub mod job;

pub use blocks::{Annotations, Block, BlockKind, InlineItem, TextSpan};
pub use job::{Attempt, JobPosting, NotReadyReason};
