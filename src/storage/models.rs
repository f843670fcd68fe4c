use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link as first seen in the channel. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    /// Nick of whoever posted the url first
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl Link {
    pub fn new(url: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            author: author.into(),
            timestamp: Utc::now(),
        }
    }
}
