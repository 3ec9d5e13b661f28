use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{form::form_fields, router::AppState};

/// Digits collected: validate and send exactly one alert.
///
/// The call itself ends on the provider's default once this returns, so the
/// response body is empty. A send failure is logged and still answers 200.
pub async fn handle_gather(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let fields = match body
        .map_err(|e| e.to_string())
        .and_then(|b| form_fields(&headers, &b).map_err(|e| e.to_string()))
    {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("Error parsing form data: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let digits = first_value(&fields, "Digits").unwrap_or_default();
    tracing::info!("User Response : {digits}");

    // Outcome is logged by the alert service.
    let _ = state.alerts.report_digits(digits).await;

    StatusCode::OK.into_response()
}

fn first_value<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
