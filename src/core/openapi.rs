use utoipa::{Modify, OpenApi};

use crate::features::villas::handlers::villa_handler;
use crate::features::villas::{dtos as villas_dtos, patch as villas_patch};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Villas
        villa_handler::list_villas,
        villa_handler::get_villa,
        villa_handler::create_villa,
        villa_handler::update_villa,
        villa_handler::patch_villa,
        villa_handler::delete_villa,
    ),
    components(
        schemas(
            // Villas
            villas_dtos::VillaDto,
            villas_dtos::CreateVillaDto,
            villas_dtos::UpdateVillaDto,
            villas_patch::PatchOperation,
            ApiResponse<villas_dtos::VillaDto>,
            ApiResponse<Vec<villas_dtos::VillaDto>>,
        )
    ),
    tags(
        (name = "villas", description = "Villa management"),
    ),
    info(
        title = "Villa API",
        version = "0.1.0",
        description = "API documentation for the Villa API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
