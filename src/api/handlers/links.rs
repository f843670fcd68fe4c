use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppQuery, JSend};
use crate::query::QueryError;
use crate::storage::Link;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub author: String,
    pub timestamp: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// `/pattern/` or an author name
    pub q: String,
}

pub async fn search_links(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<Json<JSend<Vec<LinkResponse>>>, ApiError> {
    let links =
        tokio::task::spawn_blocking(move || state.responder.queries().query(&params.q)).await?;

    match links {
        Ok(links) => Ok(JSend::success(to_responses(links))),
        Err(QueryError::BadPattern(e)) => {
            Err(ApiError::bad_request(format!("not a valid pattern: {e}")))
        }
        Err(QueryError::Store(e)) => Err(ApiError::internal(e.to_string())),
    }
}

pub async fn author_links(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Result<Json<JSend<Vec<LinkResponse>>>, ApiError> {
    let links =
        tokio::task::spawn_blocking(move || state.responder.queries().links_by_author(&author))
            .await?
            .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(to_responses(links)))
}

/// Oldest first
fn to_responses(mut links: Vec<Link>) -> Vec<LinkResponse> {
    links.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    links
        .into_iter()
        .map(|link| LinkResponse {
            author: link.author,
            timestamp: link.timestamp.to_rfc3339(),
            url: link.url,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ChatEvent;
    use crate::testutil::test_state;

    #[tokio::test]
    async fn test_search_links_by_pattern_and_author() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        state.responder.handle(&ChatEvent {
            author: "alice".to_string(),
            channel: "#test".to_string(),
            message: "http://a.com/x http://b.com/y".to_string(),
        });

        let Json(by_pattern) = search_links(
            State(Arc::clone(&state)),
            AppQuery(SearchParams {
                q: "/b\\.com/".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(by_pattern.data.len(), 1);
        assert_eq!(by_pattern.data[0].url, "http://b.com/y");

        let Json(by_author) = author_links(State(Arc::clone(&state)), Path("alice".to_string()))
            .await
            .unwrap();
        assert_eq!(by_author.data.len(), 2);
        assert!(by_author.data.iter().all(|l| l.author == "alice"));
    }

    #[tokio::test]
    async fn test_bad_pattern_is_a_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let result = search_links(
            State(state),
            AppQuery(SearchParams {
                q: "/[unclosed/".to_string(),
            }),
        )
        .await;
        assert!(matches!(
            result,
            Err(ApiError::Fail(code, _)) if code == axum::http::StatusCode::BAD_REQUEST
        ));
    }
}
