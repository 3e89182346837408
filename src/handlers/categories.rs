// handlers/categories.rs - GET /api/categories

use axum::extract::State;

use crate::database::models::Category;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Category>>> {
    let rows = state.listings.list_categories().await?;
    Ok(ApiResponse::success(rows))
}
