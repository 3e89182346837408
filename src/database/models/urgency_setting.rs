use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// At most one per listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UrgencySetting {
    pub listing_id: i32,
    pub reason: String,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrgencySettingInput {
    pub reason: String,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
}

/// Body of `POST /api/urgency_settings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUrgencySetting {
    pub listing_id: i32,
    #[serde(flatten)]
    pub setting: UrgencySettingInput,
}
