// handlers/related.rs - single-row inserts into the tables owned by a listing
//
// POST /api/listing_images
// POST /api/property_features
// POST /api/demographic_targets
// POST /api/urgency_settings

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::{NewDemographicTarget, NewListingImage, NewPropertyFeature, NewUrgencySetting};
use crate::middleware::{Acknowledged, ApiResult};
use crate::state::AppState;

pub async fn create_image(
    State(state): State<AppState>,
    payload: Result<Json<NewListingImage>, JsonRejection>,
) -> ApiResult<Acknowledged> {
    let Json(image) = payload?;
    state.listings.add_image(&image).await?;
    Ok(Acknowledged)
}

pub async fn create_feature(
    State(state): State<AppState>,
    payload: Result<Json<NewPropertyFeature>, JsonRejection>,
) -> ApiResult<Acknowledged> {
    let Json(feature) = payload?;
    state.listings.add_feature(&feature).await?;
    Ok(Acknowledged)
}

pub async fn create_demographic_target(
    State(state): State<AppState>,
    payload: Result<Json<NewDemographicTarget>, JsonRejection>,
) -> ApiResult<Acknowledged> {
    let Json(target) = payload?;
    state.listings.add_demographic_target(&target).await?;
    Ok(Acknowledged)
}

pub async fn create_urgency_setting(
    State(state): State<AppState>,
    payload: Result<Json<NewUrgencySetting>, JsonRejection>,
) -> ApiResult<Acknowledged> {
    let Json(setting) = payload?;
    state.listings.add_urgency_setting(&setting).await?;
    Ok(Acknowledged)
}
