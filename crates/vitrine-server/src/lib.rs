// Vitrine server
// Section admin API plus the public homepage, built on axum

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::homepage))
        .route("/homepage", get(routes::homepage_json))
        .route("/sections", get(routes::list_sections).post(routes::create_section))
        .route("/sections/reorder", patch(routes::reorder_sections))
        .route(
            "/sections/:id",
            get(routes::get_section)
                .put(routes::update_section)
                .delete(routes::delete_section),
        )
        .route("/sections/:id/data", get(routes::section_data))
        .route("/sections/:id/data/public", get(routes::public_section_data))
        .route("/sections/:id/fragment", get(routes::section_fragment))
        .route("/cache/clear", post(routes::clear_cache))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
