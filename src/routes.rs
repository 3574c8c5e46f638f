//! HTTP router: every endpoint, its middleware, and the shared state.

use axum::{
    Router,
    http::Method,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/types", get(handlers::pets::list_pet_types))
        .route("/types/{id}/breeds", get(handlers::pets::list_breeds_for_type))
        .route("/breeds/{id}", get(handlers::pets::get_breed))
        .route("/breeds/{id}/stores", get(handlers::pets::list_breed_stores))
        .route("/breeds/{id}/image", get(handlers::pets::get_breed_image))
        .route("/available", get(handlers::pets::list_available_pets))
        .route("/adopt", post(handlers::pets::adopt_pet))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(handlers::products::list_categories))
        .route("/list", get(handlers::products::list_products))
        .route("/cart", get(handlers::cart::view_cart))
        .route("/cart/add", post(handlers::cart::add_to_cart))
        .route("/cart/remove", post(handlers::cart::remove_from_cart))
        .route("/cart/update", post(handlers::cart::update_cart))
        .route("/{id}", get(handlers::products::get_product))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(handlers::categories::list_categories))
        .route("/search", get(handlers::categories::search_products))
        .route("/{id}/products", get(handlers::categories::category_products))
        .route("/{id}/stats", get(handlers::categories::category_stats))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/place", post(handlers::orders::place_order))
        .route("/history/{username}", get(handlers::orders::order_history))
        .route("/{id}", get(handlers::orders::get_order))
        .route("/{id}/status", put(handlers::orders::update_order_status))
}

fn vet_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(handlers::vets::list_vets))
        .route("/cities", get(handlers::vets::list_cities))
        .route("/states", get(handlers::vets::list_states))
        .route("/{id}", get(handlers::vets::get_vet))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::users::login))
        .route("/register", post(handlers::users::register))
        .route(
            "/profile/{username}",
            get(handlers::users::get_profile).put(handlers::users::update_profile),
        )
}

/// Browser clients are served from a different origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Build the application router.
///
/// Static segments such as `/api/products/list` take precedence over the
/// `/{id}` captures registered next to them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/pets", pet_routes())
        .nest("/api/products", product_routes())
        .nest("/api/shopping-categories", category_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/vets", vet_routes())
        .nest("/api/users", user_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors()),
        )
        .with_state(state)
}
