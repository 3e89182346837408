use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListingImage {
    pub id: i32,
    pub listing_id: i32,
    pub image_url: String,
    pub is_main: bool,
    /// Presentation sequence, ascending.
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Image fields without the owning listing, as nested in a new listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingImageInput {
    pub image_url: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// Body of `POST /api/listing_images`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListingImage {
    pub listing_id: i32,
    #[serde(flatten)]
    pub image: ListingImageInput,
}
