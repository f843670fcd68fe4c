//! Shared test helpers for linkeater handler tests.

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::responder::Responder;
use crate::storage::Store;
use crate::AppState;

/// Create a test AppState backed by a database in a temporary directory.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");

    let chat = ChatConfig {
        channel: "#test".to_string(),
        ..Default::default()
    };

    let store = Store::open(&data_dir).expect("Failed to open test database");
    let responder = Responder::new(chat, store.clone());

    Arc::new(AppState { store, responder })
}
