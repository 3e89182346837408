use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Audience targeting for a listing. At most one per listing.
///
/// The list columns are JSONB arrays of strings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DemographicTarget {
    pub listing_id: i32,
    pub countries: Json<Vec<String>>,
    pub states: Json<Vec<String>>,
    pub lgas: Json<Vec<String>>,
    pub age_group: Option<String>,
    pub social_class: Option<String>,
    pub occupations: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemographicTargetInput {
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub lgas: Vec<String>,
    pub age_group: Option<String>,
    pub social_class: Option<String>,
    #[serde(default)]
    pub occupations: Vec<String>,
}

/// Body of `POST /api/demographic_targets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDemographicTarget {
    pub listing_id: i32,
    #[serde(flatten)]
    pub target: DemographicTargetInput,
}
