use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// List responses: rows wrapped as `{ "data": [...] }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(json!({ "data": self.data }))).into_response()
    }
}

/// 201 with the generated identifier: `{ "id": n }`
#[derive(Debug, Clone, Copy)]
pub struct Created(pub i32);

impl IntoResponse for Created {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(json!({ "id": self.0 }))).into_response()
    }
}

/// 201 for inserts without a synthetic key: `{ "success": true }`
#[derive(Debug, Clone, Copy)]
pub struct Acknowledged;

impl IntoResponse for Acknowledged {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_statuses() {
        assert_eq!(ApiResponse::success(vec![1, 2]).into_response().status(), StatusCode::OK);
        assert_eq!(Created(5).into_response().status(), StatusCode::CREATED);
        assert_eq!(Acknowledged.into_response().status(), StatusCode::CREATED);
    }
}
