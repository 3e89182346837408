// handlers/users.rs - /api/users

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Created};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
}

/// GET /api/users?email= - exact-match lookup
pub async fn find_by_email(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Vec<User>>> {
    let Query(query) = query?;
    let email = query
        .email
        .ok_or_else(|| ApiError::bad_request("email query parameter is required"))?;

    let rows = state.users.find_by_email(&email).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<Created> {
    let Json(user) = payload?;
    let id = state.users.register(&user).await?;
    Ok(Created(id))
}
