use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::villas::handlers;
use crate::features::villas::services::VillaService;
use crate::shared::constants::VILLAS_PATH;

/// Create routes for the villas feature
pub fn routes(service: Arc<VillaService>) -> Router {
    Router::new()
        .route(
            VILLAS_PATH,
            get(handlers::list_villas).post(handlers::create_villa),
        )
        .route(
            &format!("{}/{{id}}", VILLAS_PATH),
            get(handlers::get_villa)
                .put(handlers::update_villa)
                .patch(handlers::patch_villa)
                .delete(handlers::delete_villa),
        )
        .with_state(service)
}
