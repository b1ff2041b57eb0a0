use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::villas::dtos::{CreateVillaDto, UpdateVillaDto, VillaDto};
use crate::features::villas::patch::PatchOperation;
use crate::features::villas::services::VillaService;
use crate::shared::constants::VILLAS_PATH;
use crate::shared::types::ApiResponse;

/// List all villas
///
/// Storage faults are reported inside the envelope (`isSuccess = false`)
/// while the transport status stays 200.
#[utoipa::path(
    get,
    path = "/api/villas",
    responses(
        (status = 200, description = "List of villas", body = ApiResponse<Vec<VillaDto>>),
    ),
    tag = "villas"
)]
pub async fn list_villas(
    State(service): State<Arc<VillaService>>,
) -> (StatusCode, Json<ApiResponse<Vec<VillaDto>>>) {
    let mut response = ApiResponse::default();
    match service.list().await {
        Ok(villas) => {
            response.result = Some(villas);
            response.status_code = StatusCode::OK.as_u16();
        }
        Err(e) => {
            tracing::error!("Failed to list villas: {}", e);
            response.record_failure(e.to_string());
        }
    }
    (StatusCode::OK, Json(response))
}

/// Get villa by id
#[utoipa::path(
    get,
    path = "/api/villas/{id}",
    params(
        ("id" = i32, Path, description = "Villa ID")
    ),
    responses(
        (status = 200, description = "Villa found", body = ApiResponse<VillaDto>),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Villa not found")
    ),
    tag = "villas"
)]
pub async fn get_villa(
    State(service): State<Arc<VillaService>>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ApiResponse<VillaDto>>> {
    let villa = service.get(id).await?;
    Ok(Json(ApiResponse::success(StatusCode::OK, Some(villa))))
}

/// Create a villa
#[utoipa::path(
    post,
    path = "/api/villas",
    request_body = CreateVillaDto,
    responses(
        (status = 201, description = "Villa created", body = ApiResponse<VillaDto>,
            headers(("location" = String, description = "URL of the new villa"))),
        (status = 400, description = "Validation error or duplicate name")
    ),
    tag = "villas"
)]
pub async fn create_villa(
    State(service): State<Arc<VillaService>>,
    AppJson(dto): AppJson<Option<CreateVillaDto>>,
) -> Result<(
    StatusCode,
    [(header::HeaderName, String); 1],
    Json<ApiResponse<VillaDto>>,
)> {
    let villa = service.create(dto).await?;
    let location = format!("{}/{}", VILLAS_PATH, villa.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(StatusCode::CREATED, Some(villa))),
    ))
}

/// Delete a villa
#[utoipa::path(
    delete,
    path = "/api/villas/{id}",
    params(
        ("id" = i32, Path, description = "Villa ID")
    ),
    responses(
        (status = 204, description = "Villa deleted"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Villa not found")
    ),
    tag = "villas"
)]
pub async fn delete_villa(
    State(service): State<Arc<VillaService>>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace a villa
#[utoipa::path(
    put,
    path = "/api/villas/{id}",
    params(
        ("id" = i32, Path, description = "Villa ID")
    ),
    request_body = UpdateVillaDto,
    responses(
        (status = 204, description = "Villa updated"),
        (status = 400, description = "Missing body, id mismatch or validation error")
    ),
    tag = "villas"
)]
pub async fn update_villa(
    State(service): State<Arc<VillaService>>,
    AppPath(id): AppPath<i32>,
    AppJson(dto): AppJson<Option<UpdateVillaDto>>,
) -> Result<StatusCode> {
    service.update(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Partially update a villa with a JSON Patch document
///
/// The patched villa is persisted before failed operations are reported, so
/// a 400 response may still follow a committed write.
#[utoipa::path(
    patch,
    path = "/api/villas/{id}",
    params(
        ("id" = i32, Path, description = "Villa ID")
    ),
    request_body = Vec<PatchOperation>,
    responses(
        (status = 204, description = "Villa patched"),
        (status = 400, description = "Missing patch, invalid id, unknown villa or failed operations")
    ),
    tag = "villas"
)]
pub async fn patch_villa(
    State(service): State<Arc<VillaService>>,
    AppPath(id): AppPath<i32>,
    AppJson(operations): AppJson<Option<Vec<PatchOperation>>>,
) -> Result<StatusCode> {
    service.patch(id, operations).await?;
    Ok(StatusCode::NO_CONTENT)
}
