use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::villas::models::{NewVilla, Villa};
use crate::shared::validation::validate_not_blank;

/// Request DTO for creating a villa
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVillaDto {
    #[validate(
        length(min = 1, max = 30, message = "Name must be 1-30 characters"),
        custom(function = "validate_not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[serde(default)]
    pub details: Option<String>,

    #[serde(default)]
    pub rate: f64,

    pub occupancy: i32,

    #[serde(default)]
    pub square_footage: i32,

    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub amenity: String,
}

/// Request DTO for replacing a villa, also the target shape of patch documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVillaDto {
    pub id: i32,

    #[validate(
        length(min = 1, max = 30, message = "Name must be 1-30 characters"),
        custom(function = "validate_not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[serde(default)]
    pub details: Option<String>,

    #[serde(default)]
    pub rate: f64,

    pub occupancy: i32,

    #[serde(default)]
    pub square_footage: i32,

    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub amenity: String,
}

/// Response DTO for villa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VillaDto {
    pub id: i32,
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub occupancy: i32,
    pub square_footage: i32,
    pub image_url: String,
    pub amenity: String,
}

impl From<Villa> for VillaDto {
    fn from(v: Villa) -> Self {
        Self {
            id: v.id,
            name: v.name,
            details: v.details,
            rate: v.rate,
            occupancy: v.occupancy,
            square_footage: v.square_footage,
            image_url: v.image_url,
            amenity: v.amenity,
        }
    }
}

impl From<CreateVillaDto> for NewVilla {
    fn from(dto: CreateVillaDto) -> Self {
        Self {
            name: dto.name,
            details: dto.details,
            rate: dto.rate,
            occupancy: dto.occupancy,
            square_footage: dto.square_footage,
            image_url: dto.image_url,
            amenity: dto.amenity,
        }
    }
}

/// Projection used by partial updates, timestamps are dropped
impl From<Villa> for UpdateVillaDto {
    fn from(v: Villa) -> Self {
        Self {
            id: v.id,
            name: v.name,
            details: v.details,
            rate: v.rate,
            occupancy: v.occupancy,
            square_footage: v.square_footage,
            image_url: v.image_url,
            amenity: v.amenity,
        }
    }
}

/// Timestamps are stamped with the current time; stores keep the
/// persisted `created_at` when applying an update.
impl From<UpdateVillaDto> for Villa {
    fn from(dto: UpdateVillaDto) -> Self {
        let now = Utc::now();
        Self {
            id: dto.id,
            name: dto.name,
            details: dto.details,
            rate: dto.rate,
            occupancy: dto.occupancy,
            square_footage: dto.square_footage,
            image_url: dto.image_url,
            amenity: dto.amenity,
            created_at: now,
            updated_at: now,
        }
    }
}
