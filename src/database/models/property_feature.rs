use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyFeature {
    pub id: i32,
    pub listing_id: i32,
    pub feature_type: String,
    pub feature_value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFeatureInput {
    pub feature_type: String,
    pub feature_value: String,
}

/// Body of `POST /api/property_features`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPropertyFeature {
    pub listing_id: i32,
    #[serde(flatten)]
    pub feature: PropertyFeatureInput,
}
