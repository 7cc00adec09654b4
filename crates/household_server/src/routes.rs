//! HTTP route table and handlers.
//!
//! # Responsibility
//! - Map `/households` routes onto `HouseholdService` operations.
//! - Decode request bodies and enforce the JSON content type.
//! - Render every outcome, including framework-level 404/405, as an
//!   `Envelope` with the matching HTTP status.
//!
//! # Invariants
//! - Store calls run on the blocking pool, never on an async worker.
//! - Malformed client input is always a 4xx, never a 500.
//! - Extractor rejections and handler panics are rendered as envelopes too.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use household_core::{Envelope, HouseholdService, SqliteRecordStore};
use log::{debug, error};
use rusqlite::Connection;
use serde_json::Value;
use std::any::Any;
use std::sync::{Arc, Mutex};
use tower_http::catch_panic::CatchPanicLayer;

const JSON_MIMETYPE: &str = "application/json";

/// Shared handler state: the single store connection.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` on the blocking pool against a household service bound to
    /// the store connection.
    async fn with_households<F>(&self, op: F) -> Envelope
    where
        F: FnOnce(&HouseholdService<SqliteRecordStore<'_>>) -> Envelope + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let task = tokio::task::spawn_blocking(move || match conn.lock() {
            Ok(conn) => op(&HouseholdService::new(SqliteRecordStore::new(&conn))),
            Err(_) => {
                error!("event=store_lock module=http status=error error_code=lock_poisoned");
                Envelope::server_error(None)
            }
        });

        match task.await {
            Ok(envelope) => envelope,
            Err(err) => {
                error!(
                    "event=store_task module=http status=error error_code=join_failed error={}",
                    err
                );
                Envelope::server_error(None)
            }
        }
    }
}

/// Builds the complete router for the household API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/households",
            get(list_households)
                .post(create_household)
                .fallback(method_not_allowed),
        )
        .route(
            "/households/",
            get(list_households).fallback(method_not_allowed),
        )
        .route(
            "/households/:id",
            get(get_household).fallback(method_not_allowed),
        )
        .route(
            "/households/:id/fpl-percentage",
            get(get_fpl_percentage).fallback(method_not_allowed),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(render_panic))
}

async fn create_household(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let mimetype = request_mimetype(&headers);
    if !is_json_mimetype(&mimetype) {
        let actual: &str = if mimetype.is_empty() { "none" } else { &mimetype };
        return respond(
            "create_household",
            Envelope::bad_request(Some(&format!(
                "Mimetype must be {JSON_MIMETYPE} not {actual}"
            ))),
        );
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            return respond(
                "create_household",
                rejected(rejection.status(), rejection.body_text()),
            )
        }
    };
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            return respond(
                "create_household",
                Envelope::bad_request(Some(&format!("Failed to decode JSON object: {err}"))),
            )
        }
    };

    respond(
        "create_household",
        state
            .with_households(move |households| households.create(&payload))
            .await,
    )
}

async fn list_households(State(state): State<AppState>) -> Response {
    respond(
        "list_households",
        state
            .with_households(|households| households.find_all())
            .await,
    )
}

async fn get_household(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => {
            return respond(
                "get_household",
                rejected(rejection.status(), rejection.body_text()),
            )
        }
    };
    respond(
        "get_household",
        state
            .with_households(move |households| households.find_one(&id))
            .await,
    )
}

async fn get_fpl_percentage(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => {
            return respond(
                "get_fpl_percentage",
                rejected(rejection.status(), rejection.body_text()),
            )
        }
    };
    respond(
        "get_fpl_percentage",
        state
            .with_households(move |households| households.get_fpl_percentage(&id))
            .await,
    )
}

async fn method_not_allowed() -> Response {
    respond("method_not_allowed", Envelope::method_not_allowed(None))
}

async fn route_not_found(uri: Uri) -> Response {
    respond(
        "route_not_found",
        Envelope::not_found(None, Some(&uri.to_string())),
    )
}

/// Catch-all for panics escaping a handler.
fn render_panic(_payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("event=http_panic module=http status=error error_code=handler_panicked");
    respond("panic", Envelope::server_error(None))
}

/// Envelope for an axum extractor rejection, keeping its status code.
fn rejected(status: StatusCode, message: String) -> Envelope {
    if status.is_client_error() || status.is_server_error() {
        Envelope::error(message, status.as_u16())
    } else {
        Envelope::bad_request(Some(&message))
    }
}

fn respond(handler: &str, envelope: Envelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    debug!(
        "event=http_response module=http handler={} status={}",
        handler,
        status.as_u16()
    );
    (status, Json(envelope)).into_response()
}

/// Lowercased media type without parameters; empty when the header is absent.
fn request_mimetype(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Accepts `application/json` and `application/*+json`.
fn is_json_mimetype(mimetype: &str) -> bool {
    mimetype == JSON_MIMETYPE
        || (mimetype.starts_with("application/") && mimetype.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::{is_json_mimetype, rejected, render_panic, request_mimetype};
    use axum::body::{to_bytes, Body};
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    #[test]
    fn mimetype_strips_parameters_and_case() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("Application/JSON; charset=utf-8"),
        );
        assert_eq!(request_mimetype(&headers), "application/json");
        assert_eq!(request_mimetype(&HeaderMap::new()), "");
    }

    #[test]
    fn json_mimetypes_include_structured_suffix() {
        assert!(is_json_mimetype("application/json"));
        assert!(is_json_mimetype("application/vnd.api+json"));
        assert!(!is_json_mimetype("text/plain"));
        assert!(!is_json_mimetype(""));
    }

    #[test]
    fn rejections_keep_their_status_code() {
        let envelope = rejected(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert_eq!(envelope.status_code(), 413);
        assert_eq!(envelope.message(), Some("length limit exceeded"));

        assert_eq!(rejected(StatusCode::OK, "odd".into()).status_code(), 400);
    }

    #[tokio::test]
    async fn panicking_handler_renders_server_error_envelope() {
        async fn boom() -> &'static str {
            panic!("store exploded")
        }
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(render_panic));

        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"result": null, "error": {"message": "Internal server error", "code": 500}})
        );
    }
}
