use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use storefront_catalog::{ProductDraft, SizesInput};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::Caller;

pub fn public_router() -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/products/:id/reviews", post(create_review))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services
        .query
        .search(params.page_number(), params.keyword.as_deref())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(dto::search_page_to_json(page))).into_response(),
        Err(err) => errors::catalog_error_to_response(err),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.query.get(&id).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(product))).into_response(),
        Err(err) => errors::catalog_error_to_response(err),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    multipart: Multipart,
) -> axum::response::Response {
    if let Err(err) = authz::require_admin(&caller) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string());
    }

    let (draft, image) = match collect_product_form(multipart, &services).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    match services.mutator.create(draft, image, caller.user_id()).await {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(product))).into_response(),
        Err(err) => errors::catalog_error_to_response(err),
    }
}

/// Pull the admin form apart: text fields feed the draft, repeated `sizes`
/// fields become a structured list (a single value is treated as a comma
/// blob, mirroring how browsers submit the field), the image attachment goes
/// through the asset store and only its reference is kept.
async fn collect_product_form(
    mut multipart: Multipart,
    services: &AppServices,
) -> Result<(ProductDraft, Option<String>), axum::response::Response> {
    let mut draft = ProductDraft::default();
    let mut sizes: Vec<String> = Vec::new();
    let mut image: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_multipart",
                    err.to_string(),
                ));
            }
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let filename = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| "upload".to_string());
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => {
                    return Err(errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_multipart",
                        err.to_string(),
                    ));
                }
            };
            match services.assets.save(&filename, bytes.to_vec()).await {
                Ok(reference) => image = Some(reference),
                Err(err) => {
                    return Err(errors::json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "asset_storage_failed",
                        err.to_string(),
                    ));
                }
            }
            continue;
        }

        let value = match field.text().await {
            Ok(value) => value,
            Err(err) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_multipart",
                    err.to_string(),
                ));
            }
        };

        match name.as_str() {
            "name" => draft.name = Some(value),
            "brand" => draft.brand = Some(value),
            "category" => draft.category = Some(value),
            "description" => draft.description = Some(value),
            "price" => draft.price = Some(value),
            "countInStock" => draft.count_in_stock = Some(value),
            "sizes" => sizes.push(value),
            _ => {}
        }
    }

    draft.sizes = match sizes.len() {
        0 => None,
        1 => sizes.pop().map(SizesInput::Text),
        _ => Some(SizesInput::List(sizes)),
    };

    Ok((draft, image))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    if let Err(err) = authz::require_admin(&caller) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string());
    }

    match services.mutator.update(&id, body.into()).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(product))).into_response(),
        Err(err) => errors::catalog_error_to_response(err),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(err) = authz::require_admin(&caller) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string());
    }

    match services.mutator.delete(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Product removed" })),
        )
            .into_response(),
        Err(err) => errors::catalog_error_to_response(err),
    }
}

pub async fn create_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateReviewRequest>,
) -> axum::response::Response {
    let comment = body.comment.unwrap_or_default();
    match services
        .reviews
        .add_review(&id, caller.user_id(), caller.name(), body.rating, &comment)
        .await
    {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "message": "Review added" })),
        )
            .into_response(),
        Err(err) => errors::catalog_error_to_response(err),
    }
}
