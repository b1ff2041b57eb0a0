use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for villa
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Villa {
    pub id: i32,
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub occupancy: i32,
    pub square_footage: i32,
    pub image_url: String,
    pub amenity: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Villa fields supplied on insert; the store assigns id and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct NewVilla {
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub occupancy: i32,
    pub square_footage: i32,
    pub image_url: String,
    pub amenity: String,
}

impl NewVilla {
    pub fn into_villa(self, id: i32, now: DateTime<Utc>) -> Villa {
        Villa {
            id,
            name: self.name,
            details: self.details,
            rate: self.rate,
            occupancy: self.occupancy,
            square_footage: self.square_footage,
            image_url: self.image_url,
            amenity: self.amenity,
            created_at: now,
            updated_at: now,
        }
    }
}
