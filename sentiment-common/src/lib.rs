//! # Sentiment Hub Common Library
//!
//! Shared code for the sentiment service:
//! - Database pool setup and schema
//! - Record models and the sentiment label set
//! - Aggregate view types
//! - Push event types sent to live subscribers

pub mod aggregate;
pub mod db;
pub mod error;
pub mod events;
pub mod labels;

pub use error::{Error, Result};
pub use labels::SentimentLabel;
