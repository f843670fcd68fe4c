use regex::Regex;
use thiserror::Error;

use crate::storage::{author_partition, codec, Link, ReadPartition, Store, StoreError, URLS};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Not a valid pattern: {0}")]
    BadPattern(#[from] regex::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a lookup term is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// `/pattern/`: regex over every stored url
    Pattern(&'a str),
    /// Anything else: links first posted by this author
    Author(&'a str),
}

impl<'a> Query<'a> {
    pub fn parse(term: &'a str) -> Self {
        let term = term.trim();
        match term
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(pattern) => Query::Pattern(pattern),
            None => Query::Author(term),
        }
    }
}

/// Read side of the link store. Results come back in raw key order; callers
/// that present them sort on `timestamp`.
pub struct QueryEngine {
    store: Store,
}

impl QueryEngine {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn query(&self, term: &str) -> Result<Vec<Link>, QueryError> {
        match Query::parse(term) {
            Query::Pattern(pattern) => self.search_pattern(pattern),
            Query::Author(author) => Ok(self.links_by_author(author)?),
        }
    }

    /// Every stored link whose url matches `pattern`.
    pub fn search_pattern(&self, pattern: &str) -> Result<Vec<Link>, QueryError> {
        let regex = Regex::new(pattern)?;

        self.store.read(|scope| -> Result<Vec<Link>, QueryError> {
            match scope.partition(URLS)? {
                Some(partition) => Ok(decode_matching(&partition, |url| regex.is_match(url))?),
                None => Ok(Vec::new()),
            }
        })
    }

    /// Links first posted by `author`. An author who never posted has no
    /// partition, which is an empty result rather than an error.
    pub fn links_by_author(&self, author: &str) -> Result<Vec<Link>, StoreError> {
        self.store.read(|scope| -> Result<Vec<Link>, StoreError> {
            match scope.partition(&author_partition(author))? {
                Some(partition) => decode_matching(&partition, |_| true),
                None => Ok(Vec::new()),
            }
        })
    }
}

/// Decode the entries whose key passes `filter`, skipping undecodable ones.
fn decode_matching<F>(partition: &ReadPartition, filter: F) -> Result<Vec<Link>, StoreError>
where
    F: Fn(&str) -> bool,
{
    let mut links = Vec::new();
    partition.for_each(|url, data| {
        if !filter(url) {
            return;
        }
        match codec::decode(data) {
            Ok(link) => links.push(link),
            Err(e) => tracing::warn!(url = %url, error = %e, "Could not decode link"),
        }
    })?;
    Ok(links)
}
