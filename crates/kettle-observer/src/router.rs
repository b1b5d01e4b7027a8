//! Axum router construction for the web control surface.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- redirect to the creation form
/// - `GET /kettle/new` -- creation form
/// - `POST /kettle/new` -- create a kettle
/// - `GET /kettle/{id}` -- kettle page
/// - `POST /kettle/{id}` -- switch a kettle on or off
/// - `GET /api/kettles` -- snapshots of every registered kettle
/// - `GET /api/kettles/{id}` -- kettle snapshot as JSON
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/kettle/new",
            get(handlers::new_kettle_form).post(handlers::create_kettle),
        )
        .route(
            "/kettle/{id}",
            get(handlers::show_kettle).post(handlers::switch_kettle),
        )
        .route("/api/kettles", get(handlers::list_kettles))
        .route("/api/kettles/{id}", get(handlers::get_kettle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
