use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, JSend};
use crate::responder::ChatEvent;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Texts for the bridge to send to the channel, in order
    pub replies: Vec<String>,
}

/// Accept one chat event from the bridge.
///
/// Store work is blocking, so it runs on the blocking pool and a big batch
/// or a slow scan never stalls other requests.
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    AppJson(event): AppJson<ChatEvent>,
) -> Result<Json<JSend<EventResponse>>, ApiError> {
    let replies =
        tokio::task::spawn_blocking(move || state.responder.handle(&event)).await?;

    Ok(JSend::success(EventResponse { replies }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_state;

    fn event(author: &str, channel: &str, message: &str) -> AppJson<ChatEvent> {
        AppJson(ChatEvent {
            author: author.to_string(),
            channel: channel.to_string(),
            message: message.to_string(),
        })
    }

    async fn replies(state: &Arc<AppState>, event: AppJson<ChatEvent>) -> Vec<String> {
        let Json(response) = post_event(State(Arc::clone(state)), event)
            .await
            .expect("event should be accepted");
        response.data.replies
    }

    #[tokio::test]
    async fn test_first_post_is_silent_and_repost_is_called_out() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let first = replies(&state, event("alice", "#test", "look http://x.com")).await;
        assert!(first.is_empty());

        let second = replies(&state, event("bob", "#test", "http://x.com is neat")).await;
        assert_eq!(second.len(), 1);
        assert!(second[0].contains("alice"));
    }

    #[tokio::test]
    async fn test_other_channels_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let out = replies(&state, event("alice", "#elsewhere", "http://x.com")).await;
        assert!(out.is_empty());
        assert_eq!(state.store.stats().unwrap().links, 0);
    }

    #[tokio::test]
    async fn test_lookup_through_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        replies(&state, event("alice", "#test", "http://a.com/x http://b.com/y")).await;

        let found = replies(&state, event("carol", "#test", "^url /a\\.com/")).await;
        assert_eq!(found, vec!["http://a.com/x"]);

        let none = replies(&state, event("carol", "#test", "^url dave")).await;
        assert_eq!(none, vec!["Ain't found no matching links."]);
    }

    #[tokio::test]
    async fn test_response_body_is_a_jsend_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        replies(&state, event("alice", "#test", "http://x.com")).await;
        let Json(response) = post_event(State(state), event("bob", "#test", "http://x.com"))
            .await
            .unwrap();

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["status"], "success");
        let replies = body["data"]["replies"].as_array().unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].as_str().unwrap().starts_with("Nice repost. alice"));
    }
}
