use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub chat: ChatConfig,
    pub node: NodeConfig,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    /// Directory holding the redb file
    pub data_dir: String,
}

/// What the responder listens to and how it talks back.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The only channel whose messages are recorded and answered
    pub channel: String,
    /// Message prefix that turns the rest of the message into a lookup
    pub lookup_cmd: String,
    pub replies: ReplyTemplates,
}

/// Reply texts. `repost` understands `{author}`, `{time}` and `{url}`.
#[derive(Debug, Clone)]
pub struct ReplyTemplates {
    pub repost: String,
    pub no_results: String,
    pub bad_pattern: String,
    /// strftime format used for `{time}`
    pub time_format: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel: "#linkeater".to_string(),
            lookup_cmd: "^url".to_string(),
            replies: ReplyTemplates::default(),
        }
    }
}

impl Default for ReplyTemplates {
    fn default() -> Self {
        Self {
            repost: "Nice repost. {author} already posted that on {time}".to_string(),
            no_results: "Ain't found no matching links.".to_string(),
            bad_pattern: "That ain't a regex, mang.".to_string(),
            time_format: "%-d %b %Y %H:%M".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let node_defaults = NodeConfig::default();
        let chat_defaults = ChatConfig::default();
        let reply_defaults = chat_defaults.replies.clone();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(node_defaults.bind_address);
        let data_dir = std::env::var("DATA_DIR").unwrap_or(node_defaults.data_dir);

        let channel = std::env::var("CHANNEL").unwrap_or(chat_defaults.channel);
        let lookup_cmd = std::env::var("LOOKUP_CMD").unwrap_or(chat_defaults.lookup_cmd);

        let replies = ReplyTemplates {
            repost: std::env::var("REPOST_TEMPLATE").unwrap_or(reply_defaults.repost),
            no_results: std::env::var("NO_RESULTS_TEMPLATE").unwrap_or(reply_defaults.no_results),
            bad_pattern: std::env::var("BAD_PATTERN_TEMPLATE")
                .unwrap_or(reply_defaults.bad_pattern),
            time_format: std::env::var("TIME_FORMAT").unwrap_or(reply_defaults.time_format),
        };

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            chat: ChatConfig {
                channel,
                lookup_cmd,
                replies,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.channel.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "CHANNEL cannot be empty".to_string(),
            ));
        }

        // An empty prefix would turn every message into a lookup
        if self.chat.lookup_cmd.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "LOOKUP_CMD cannot be empty".to_string(),
            ));
        }

        if self.node.data_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "DATA_DIR cannot be empty".to_string(),
            ));
        }

        if StrftimeItems::new(&self.chat.replies.time_format).any(|item| item == Item::Error) {
            return Err(ConfigError::ValidationError(format!(
                "TIME_FORMAT '{}' is not a valid strftime format",
                self.chat.replies.time_format
            )));
        }

        if !self.chat.replies.repost.contains("{author}") {
            tracing::warn!(
                "REPOST_TEMPLATE has no {{author}} placeholder; repost replies won't name the original poster"
            );
        }

        Ok(())
    }
}
