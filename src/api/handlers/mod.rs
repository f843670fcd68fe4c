mod admin;
mod events;
mod links;

pub use admin::health;
pub use events::post_event;
pub use links::{author_links, search_links};
