use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Routes reachable without a token: health plus catalog reads.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(products::public_router())
}

/// Routes that require a verified caller (the auth middleware is layered on
/// by `build_app`).
pub fn protected_router() -> Router {
    products::protected_router()
}
