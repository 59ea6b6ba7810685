//! Item endpoints.
//!
//! Handlers only decode, call the usecase and encode. Rule checks and their
//! order live in `ItemUsecase`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use vault_core::{CategorySummary, CreateItemInput, Item, UpdateItemInput};
use vault_db::Storage;

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Parses a path id. Only positive integers name an item.
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::validation(format!("invalid item id: {raw:?}")))
}

/// `GET /items`
pub async fn list<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<Vec<Item>>> {
    let ctx = state.request_context();
    Ok(Json(state.items().get_all_items(&ctx).await?))
}

/// `GET /items/summary`
pub async fn summary<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<CategorySummary>> {
    let ctx = state.request_context();
    Ok(Json(state.items().get_category_summary(&ctx).await?))
}

/// `GET /items/{id}`
pub async fn get<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Item>> {
    let id = parse_id(&raw_id)?;
    let ctx = state.request_context();
    Ok(Json(state.items().get_item_by_id(&ctx, id).await?))
}

/// `POST /items`
pub async fn create<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateItemInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let Json(input) = payload?;
    let ctx = state.request_context();
    let item = state.items().create_item(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /items/{id}`
pub async fn update<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateItemInput>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let id = parse_id(&raw_id)?;
    let Json(input) = payload?;
    let ctx = state.request_context();
    Ok(Json(state.items().update_item(&ctx, id, input).await?))
}

/// `DELETE /items/{id}`
pub async fn delete<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    let ctx = state.request_context();
    state.items().delete_item(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use vault_db::{Database, DbConfig, RequestContext};
    use vault_usecase::ItemUsecase;

    use super::*;
    use crate::error::ErrorCode;
    use crate::routes::{router, REQUEST_ID_HEADER};

    async fn app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(
            ItemUsecase::new(db.items()),
            RequestContext::background(),
            Duration::from_secs(5),
        );
        router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn rolex() -> String {
        json!({
            "name": "Submariner",
            "category": "Watch",
            "brand": "ROLEX",
            "purchase_price": 1_000_000,
            "purchase_date": "2023-01-01"
        })
        .to_string()
    }

    fn error_code(body: &Value) -> ErrorCode {
        serde_json::from_value(body["code"].clone()).unwrap()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let app = app().await;

        let (status, created) = send(&app, Method::POST, "/items", Some(&rolex())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
        assert_eq!(created["purchase_date"], "2023-01-01");

        let (status, fetched) = send(&app, Method::GET, "/items/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, all) = send(&app, Method::GET, "/items", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let app = app().await;

        let negative = json!({
            "name": "x", "category": "Bag", "brand": "Chanel",
            "purchase_price": -1, "purchase_date": "2023-01-01"
        })
        .to_string();
        let (status, body) = send(&app, Method::POST, "/items", Some(&negative)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), ErrorCode::ValidationError);

        let missing_field = json!({ "name": "x" }).to_string();
        let (status, _) = send(&app, Method::POST, "/items", Some(&missing_field)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::POST, "/items", Some("invalid json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let app = app().await;
        for uri in ["/items/invalid", "/items/0", "/items/-1"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(error_code(&body), ErrorCode::ValidationError);
        }

        let (status, _) = send(&app, Method::PATCH, "/items/abc", Some(r#"{"name":"x"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::DELETE, "/items/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_flow() {
        let app = app().await;
        send(&app, Method::POST, "/items", Some(&rolex())).await;

        let (status, updated) =
            send(&app, Method::PATCH, "/items/1", Some(r#"{"purchase_price": 2000000}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["purchase_price"], 2_000_000);
        assert_eq!(updated["name"], "Submariner");

        // Rejected bodies
        for body in [
            "{}",
            r#"{"name": ""}"#,
            r#"{"brand": ""}"#,
            r#"{"purchase_price": -1}"#,
            r#"{"name": null}"#,
            "invalid json",
        ] {
            let (status, _) = send(&app, Method::PATCH, "/items/1", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        }

        let (status, body) = send(&app, Method::PATCH, "/items/999", Some(r#"{"name":"x"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let app = app().await;
        send(&app, Method::POST, "/items", Some(&rolex())).await;

        let (status, body) = send(&app, Method::DELETE, "/items/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, Method::DELETE, "/items/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_summary() {
        let app = app().await;

        let (status, empty) = send(&app, Method::GET, "/items/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty["total_count"], 0);
        assert_eq!(empty["categories"], json!({}));

        send(&app, Method::POST, "/items", Some(&rolex())).await;
        let omega = json!({
            "name": "Speedmaster", "category": "Watch", "brand": "Omega",
            "purchase_price": 800_000, "purchase_date": "2023-03-15"
        })
        .to_string();
        send(&app, Method::POST, "/items", Some(&omega)).await;

        let (_, summary) = send(&app, Method::GET, "/items/summary", None).await;
        assert_eq!(summary["categories"]["Watch"]["count"], 2);
        assert_eq!(summary["categories"]["Watch"]["total_price"], 1_800_000);
    }

    #[tokio::test]
    async fn test_cancelled_root_is_service_unavailable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (root, handle) = RequestContext::cancellable();
        let app = router(AppState::new(
            ItemUsecase::new(db.items()),
            root,
            Duration::from_secs(5),
        ));
        handle.cancel();

        let (status, body) = send(&app, Method::GET, "/items", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_code(&body), ErrorCode::RequestCancelled);
    }
}
