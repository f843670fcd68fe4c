//! Dedup-check-and-insert of candidate urls.
//!
//! A whole batch runs inside one write scope. redb allows a single writer at a
//! time, so two batches carrying the same new url can't both see it as absent:
//! the later one observes the earlier commit and reports a repost.

use chrono::{DateTime, Utc};

use crate::storage::{
    author_partition, codec, Link, Store, StoreError, WritePartition, WriteScope, URLS,
};

/// What happened to a single candidate url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// First sighting; the link is now stored for `author`.
    Stored { url: String },
    /// Already posted by someone (possibly the same author).
    Repost {
        url: String,
        original_author: String,
        original_time: DateTime<Utc>,
    },
    /// Nothing was written and no repost could be reported: the existing record
    /// is unreadable, or the new one could not be encoded.
    Skipped { url: String },
}

pub struct IngestPipeline {
    store: Store,
}

impl IngestPipeline {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Record every url in `urls` for `author`, returning one outcome per input url.
    ///
    /// Duplicates within the batch see the insert made for their first
    /// occurrence and come back as reposts. A store error aborts the batch and
    /// nothing from it is committed.
    pub fn ingest(&self, urls: &[String], author: &str) -> Result<Vec<Outcome>, StoreError> {
        self.store.write(|scope| -> Result<Vec<Outcome>, StoreError> {
            let mut links = scope.partition_or_create(URLS)?;
            let author_table = author_partition(author);

            let mut outcomes = Vec::with_capacity(urls.len());
            for url in urls {
                let outcome = match links.get(url)? {
                    Some(existing) => repost_of(url, &existing),
                    None => insert(scope, &mut links, &author_table, url, author)?,
                };
                outcomes.push(outcome);
            }
            Ok(outcomes)
        })
    }
}

fn repost_of(url: &str, existing: &[u8]) -> Outcome {
    match codec::decode(existing) {
        Ok(original) => Outcome::Repost {
            url: url.to_string(),
            original_author: original.author,
            original_time: original.timestamp,
        },
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to decode stored link");
            Outcome::Skipped {
                url: url.to_string(),
            }
        }
    }
}

/// Write a fresh link to the primary partition and the author's partition.
/// Both entries hold the exact same encoded bytes.
fn insert(
    scope: &WriteScope,
    links: &mut WritePartition<'_>,
    author_table: &str,
    url: &str,
    author: &str,
) -> Result<Outcome, StoreError> {
    let link = Link::new(url, author);
    let encoded = match codec::encode(&link) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Failed to encode link, not storing it");
            return Ok(Outcome::Skipped {
                url: url.to_string(),
            });
        }
    };

    tracing::info!(url = %url, author = %author, "Storing link");
    links.put(url, &encoded)?;
    scope.partition_or_create(author_table)?.put(url, &encoded)?;

    Ok(Outcome::Stored {
        url: url.to_string(),
    })
}
