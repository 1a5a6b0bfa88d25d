//! Defines routes for all seller, pet, user and bucket operations.
//!
//! ## Structure
//! - **Sellers**
//!   - `GET    /sellers`       - list (supports `include_pets`)
//!   - `POST   /sellers`       - create
//!   - `GET    /sellers/{id}`  - fetch (supports `include_pets`)
//!   - `PUT    /sellers/{id}`  - partial update
//!   - `DELETE /sellers/{id}`  - delete, refused while the seller owns pets
//!
//! - **Pets**
//!   - `GET    /pets`          - list (supports `include_seller`, `seller_id`)
//!   - `POST   /pets`          - create
//!   - `GET    /pets/{id}`     - fetch (supports `include_seller`)
//!   - `PUT    /pets/{id}`     - partial update
//!   - `DELETE /pets/{id}`     - delete
//!
//! - **Users and their buckets**
//!   - `GET|POST /users`, `GET|PUT|DELETE /users/{id}`
//!   - `GET|POST /users/{id}/favorites`, `DELETE /users/{id}/favorites/{pet_id}`
//!   - `GET|POST /users/{id}/cart`, `DELETE /users/{id}/cart/{pet_id}`
//!
//! Unknown paths get axum's 404 and known paths with the wrong method its 405.

use crate::{
    handlers::{
        bucket_handlers::{
            add_favorite, add_to_cart, list_cart, list_favorites, remove_favorite,
            remove_from_cart,
        },
        health_handlers::{healthz, readyz},
        pet_handlers::{create_pet, delete_pet, get_pet, list_pets, update_pet},
        seller_handlers::{create_seller, delete_seller, get_seller, list_sellers, update_seller},
        user_handlers::{create_user, delete_user, get_user, list_users, update_user},
    },
    state::AppState,
};
use axum::{
    Router,
    http::{Method, header},
    routing::{delete, get},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Build the route table. The caller supplies the state.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Sellers
        .route("/sellers", get(list_sellers).post(create_seller))
        .route(
            "/sellers/{id}",
            get(get_seller).put(update_seller).delete(delete_seller),
        )
        // Pets
        .route("/pets", get(list_pets).post(create_pet))
        .route(
            "/pets/{id}",
            get(get_pet).put(update_pet).delete(delete_pet),
        )
        // Users
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Buckets
        .route(
            "/users/{id}/favorites",
            get(list_favorites).post(add_favorite),
        )
        .route("/users/{id}/favorites/{pet_id}", delete(remove_favorite))
        .route("/users/{id}/cart", get(list_cart).post(add_to_cart))
        .route("/users/{id}/cart/{pet_id}", delete(remove_from_cart))
}

/// Permissive cross-origin policy applied to every response, including
/// preflight requests for paths that have no route.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// The complete application: routes, state, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(cors())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
