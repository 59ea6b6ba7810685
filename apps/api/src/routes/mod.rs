//! # HTTP Routes
//!
//! ```text
//! GET    /health           → health::check
//! GET    /items            → items::list
//! POST   /items            → items::create        (201)
//! GET    /items/summary    → items::summary
//! GET    /items/{id}       → items::get
//! PATCH  /items/{id}       → items::update
//! DELETE /items/{id}       → items::delete        (204)
//! ```
//!
//! Every request passes through [`log_requests`], which tags it with a
//! request id and logs status and latency.

pub mod health;
pub mod items;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use vault_db::Storage;

use crate::state::AppState;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the application router.
pub fn router<S: Storage + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::check::<S>))
        .route("/items", get(items::list::<S>).post(items::create::<S>))
        .route("/items/summary", get(items::summary::<S>))
        .route(
            "/items/{id}",
            get(items::get::<S>)
                .patch(items::update::<S>)
                .delete(items::delete::<S>),
        )
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Opens a span per request and logs the outcome.
async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = elapsed_ms,
            "Request completed"
        )
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
