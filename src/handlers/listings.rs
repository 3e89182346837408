// handlers/listings.rs - /api/listings and /api/listings/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::models::{ListingDetail, ListingSummary, NewListing};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Created};
use crate::state::AppState;

/// GET /api/listings - all listings with category and owner names, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<ListingSummary>>> {
    let rows = state.listings.list_listings().await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/listings/:id - the aggregated listing, unwrapped
///
/// An id that is not an integer cannot name a row, so it is a 404 without a
/// round trip to the store.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<ListingDetail>> {
    let listing_id: i32 = id
        .parse()
        .map_err(|_| ApiError::not_found("Listing not found"))?;

    let detail = state.listings.get_listing(listing_id).await?;
    Ok(Json(detail))
}

/// POST /api/listings - create a listing, with any nested rows, atomically
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewListing>, JsonRejection>,
) -> ApiResult<Created> {
    let Json(listing) = payload?;
    let id = state.listings.create_listing(&listing).await?;
    Ok(Created(id))
}
