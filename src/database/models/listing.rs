use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{
    DemographicTarget, DemographicTargetInput, ListingImage, ListingImageInput, PropertyFeature,
    PropertyFeatureInput, UrgencySetting, UrgencySettingInput,
};

/// A row of `listings`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub category_id: i32,
    pub user_id: i32,
    pub main_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing joined with its category and owner, as returned by `GET /api/listings`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListingSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub category_name: String,
    pub owner_name: Option<String>,
}

/// Listing joined with its category and owner contact details. This is the
/// root row of the aggregated listing view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListingCore {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub category_name: String,
    pub owner_name: Option<String>,
    pub phone_number: Option<String>,
    pub whatsapp_link: Option<String>,
}

/// Composite view of one listing: the core row with its related rows nested.
///
/// `demographic_targets` and `urgency_settings` serialize as `null` when the
/// listing has no such row; `images` and `features` are always arrays.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub core: ListingCore,
    pub images: Vec<ListingImage>,
    pub features: Vec<PropertyFeature>,
    pub demographic_targets: Option<DemographicTarget>,
    pub urgency_settings: Option<UrgencySetting>,
}

/// Body of `POST /api/listings`.
///
/// The nested collections are optional; when present they are written in the
/// same transaction as the listing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub category_id: i32,
    pub user_id: i32,
    pub main_image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<ListingImageInput>,
    #[serde(default)]
    pub features: Vec<PropertyFeatureInput>,
    #[serde(default)]
    pub demographic_targets: Option<DemographicTargetInput>,
    #[serde(default)]
    pub urgency_settings: Option<UrgencySettingInput>,
}
