// handlers/auth.rs - POST /api/auth/login
//
// A single credential check against `users`; there are no sessions or tokens.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::{Credentials, User};
use crate::middleware::ApiResult;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(credentials) = payload?;
    let user = state.users.login(&credentials).await?;
    Ok(Json(user))
}
