//! HTTP route handlers for the API

use super::AppState;
use crate::parser::Status;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json; charset=utf-8";

// ============================================================================
// Health Check
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============================================================================
// Listings
// ============================================================================

/// `GET /` - every entry as `key: value`, one per line
pub async fn list_entries(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_all().await {
        Ok(entries) => {
            let body = entries
                .iter()
                .map(|e| format!("{}: {}", e.key, e.value))
                .collect::<Vec<_>>()
                .join("\n");
            ([(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list entries: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, TEXT_PLAIN)],
                "failed to list entries",
            )
                .into_response()
        }
    }
}

/// `GET /json` - every entry as a `{key, value}` array
pub async fn list_entries_json(State(state): State<AppState>) -> impl IntoResponse {
    let result = match state.store.list_all().await {
        Ok(entries) => serde_json::to_string(&entries).map_err(crate::error::CoreError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(body) => ([(header::CONTENT_TYPE, APPLICATION_JSON)], body).into_response(),
        Err(e) => {
            tracing::error!("Failed to list entries: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Lingr webhook
// ============================================================================

/// `POST /lingr` - run the karuta commands in the batch and reply in plain text.
///
/// The body is decoded by hand so a malformed payload still gets a 200 with
/// an empty reply instead of an extractor rejection.
pub async fn lingr_webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let status = Status::from_slice(&body);
    let reply = state.handler.handle(&status.events).await;
    ([(header::CONTENT_TYPE, TEXT_PLAIN)], reply)
}

#[cfg(test)]
mod tests {
    use crate::api::{create_router, AppState};
    use crate::db::Database;
    use crate::ephemeral::EphemeralIndex;
    use crate::store::KarutaStore;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(store: KarutaStore) -> Router {
        create_router(AppState::new(store))
    }

    fn app() -> (Router, KarutaStore) {
        let store = KarutaStore::Ephemeral(Arc::new(EphemeralIndex::new()));
        (app_with(store.clone()), store)
    }

    fn lingr_body(texts: &[&str]) -> String {
        let events: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                serde_json::json!({
                    "event_id": i,
                    "message": {
                        "id": i.to_string(),
                        "room": "vim",
                        "speaker_id": "tester",
                        "nickname": "tester",
                        "type": "user",
                        "text": text
                    }
                })
            })
            .collect();
        serde_json::json!({ "status": "ok", "events": events }).to_string()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_lingr(app: &Router, body: impl Into<Body>) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/lingr")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let (status, _, text) = send(app, request).await;
        (status, text)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, String, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let (status, _, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_webhook_register_and_query() {
        let (app, _) = app();

        let (status, reply) = post_lingr(&app, lingr_body(&["!vim-karuta あ :help"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, "登録しました");

        let (_, reply) = post_lingr(&app, lingr_body(&["!vim-karuta あ :h"])).await;
        assert_eq!(reply, "更新しました");

        let (_, reply) = post_lingr(&app, lingr_body(&["?vim-karuta あ"])).await;
        assert_eq!(reply, "あ: :h");
    }

    #[tokio::test]
    async fn test_webhook_rebukes_bad_key() {
        let (app, store) = app();
        let (status, reply) = post_lingr(&app, lingr_body(&["!vim-karuta vim editor"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, "お前いい加減にしろよ");
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_malformed_body_is_empty_reply() {
        let (app, _) = app();
        let (status, reply) = post_lingr(&app, "{\"events\": [").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn test_webhook_ignores_chatter() {
        let (app, _) = app();
        let (status, reply) = post_lingr(&app, lingr_body(&["おはよう", "?vim-karuta ん"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn test_list_entries_text() {
        let (app, store) = app();
        let (status, content_type, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/plain; charset=utf-8");
        assert_eq!(body, "");

        store.insert("ん", "2").await.unwrap();
        store.insert("あ", "1").await.unwrap();
        let (_, _, body) = get(&app, "/").await;
        assert_eq!(body, "あ: 1\nん: 2");
    }

    #[tokio::test]
    async fn test_list_entries_json_empty_is_array() {
        let (app, _) = app();
        let (status, content_type, body) = get(&app, "/json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json; charset=utf-8");
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_list_entries_json_ordered() {
        let store = KarutaStore::Db(Arc::new(Database::open_in_memory().unwrap()));
        let app = app_with(store.clone());

        post_lingr(&app, lingr_body(&["!vim-karuta ん 2", "!vim-karuta あ 1"])).await;

        let (_, _, body) = get(&app, "/json").await;
        assert_eq!(
            body,
            r#"[{"key":"あ","value":"1"},{"key":"ん","value":"2"}]"#
        );
    }

    #[tokio::test]
    async fn test_listing_reports_storage_failure() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.conn().execute("DROP TABLE karuta", []).unwrap();
        let app = app_with(KarutaStore::Db(db));

        let (status, _, _) = get(&app, "/json").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _, _) = get(&app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        // Webhook stays silent on storage errors
        let (status, reply) = post_lingr(&app, lingr_body(&["!vim-karuta あ x"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, "");
    }
}
