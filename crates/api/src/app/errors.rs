use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_core::CatalogError;

/// Map a catalog failure onto the wire contract. Nothing is swallowed; the
/// store cause travels with the 500.
pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CatalogError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        CatalogError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "Product not found"),
        CatalogError::DuplicateReview => {
            json_error(StatusCode::BAD_REQUEST, "duplicate_review", "Product already reviewed")
        }
        CatalogError::StoreUnavailable(cause) => {
            tracing::error!(%cause, "store failure reached the request boundary");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_unavailable",
                format!("store unavailable: {cause}"),
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
