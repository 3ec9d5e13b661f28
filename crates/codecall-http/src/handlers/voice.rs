use axum::{http::header, response::IntoResponse};

use codecall_core::markup;

/// Call answered: ask for the code. Request body and headers are ignored.
pub async fn handle_voice() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, markup::CONTENT_TYPE)],
        markup::code_prompt().to_xml(),
    )
}
