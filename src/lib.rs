//! linkeater - link deduplication and attribution for chat channels
//!
//! Watches a channel's messages, records who first posted each url and when,
//! and calls out reposts. Provides:
//! - redb embedded database with one primary partition plus one partition per author
//! - atomic dedup-check-and-insert per message batch
//! - regex search over stored urls and per-author history
//! - an HTTP gateway a chat bridge posts events into

pub mod api;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod query;
pub mod responder;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use responder::Responder;
use storage::Store;

/// Shared application state
pub struct AppState {
    pub store: Store,
    pub responder: Responder,
}
