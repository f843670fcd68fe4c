//! Routes chat events to ingestion or lookup and renders the replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::config::ChatConfig;
use crate::extract::extract_links;
use crate::ingest::{IngestPipeline, Outcome};
use crate::query::{QueryEngine, QueryError};
use crate::storage::Store;

/// A message as delivered by the chat bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    pub author: String,
    pub channel: String,
    pub message: String,
}

pub struct Responder {
    config: ChatConfig,
    pipeline: IngestPipeline,
    queries: QueryEngine,
}

impl Responder {
    pub fn new(config: ChatConfig, store: Store) -> Self {
        Self {
            config,
            pipeline: IngestPipeline::new(store.clone()),
            queries: QueryEngine::new(store),
        }
    }

    pub fn queries(&self) -> &QueryEngine {
        &self.queries
    }

    /// Handle one event and return the texts to send back to the channel, in order.
    ///
    /// Store failures are logged here and produce no reply; the event is dropped.
    pub fn handle(&self, event: &ChatEvent) -> Vec<String> {
        if event.channel != self.config.channel {
            return Vec::new();
        }

        match event.message.strip_prefix(self.config.lookup_cmd.as_str()) {
            Some(term) => self.lookup(term),
            None => self.record(event),
        }
    }

    fn lookup(&self, term: &str) -> Vec<String> {
        let replies = &self.config.replies;
        match self.queries.query(term) {
            Ok(links) if links.is_empty() => vec![replies.no_results.clone()],
            Ok(mut links) => {
                links.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.url.cmp(&b.url)));
                links.into_iter().map(|link| link.url).collect()
            }
            Err(QueryError::BadPattern(_)) => vec![replies.bad_pattern.clone()],
            Err(QueryError::Store(e)) => {
                tracing::error!(term = %term.trim(), error = %e, "Lookup failed");
                Vec::new()
            }
        }
    }

    fn record(&self, event: &ChatEvent) -> Vec<String> {
        let links = extract_links(&event.message);
        if links.is_empty() {
            return Vec::new();
        }

        let outcomes = match self.pipeline.ingest(&links, &event.author) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!(
                    author = %event.author,
                    links = links.len(),
                    error = %e,
                    "Failed to store links, dropping batch"
                );
                return Vec::new();
            }
        };

        outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                Outcome::Repost {
                    url,
                    original_author,
                    original_time,
                } => Some(self.repost_reply(url, original_author, original_time)),
                Outcome::Stored { .. } | Outcome::Skipped { .. } => None,
            })
            .collect()
    }

    fn repost_reply(&self, url: &str, author: &str, time: &DateTime<Utc>) -> String {
        let replies = &self.config.replies;
        let mut rendered_time = String::new();
        if write!(rendered_time, "{}", time.format(&replies.time_format)).is_err() {
            rendered_time = time.to_rfc3339();
        }
        render(&replies.repost, |name| match name {
            "author" => Some(author),
            "time" => Some(rendered_time.as_str()),
            "url" => Some(url),
            _ => None,
        })
    }
}

/// Fill `{name}` placeholders in a single left-to-right pass. Substituted text
/// is never scanned again, so a url containing `{time}` comes out verbatim.
/// Unknown placeholders are kept as written.
fn render<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after
            .find('}')
            .and_then(|close| lookup(&after[..close]).map(|value| (close, value)))
        {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
