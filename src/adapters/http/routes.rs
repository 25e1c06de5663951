use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use serde_json::json;

use crate::adapters::http::state::HttpState;
use crate::application::dto::{GradeRequest, GradeResponse};
use crate::domain::errors::DomainError;

pub async fn home() -> impl IntoResponse {
    Json(json!({ "message": "route-grader en marcha" }))
}

pub async fn get_config(State(st): State<HttpState>) -> impl IntoResponse {
    Json(st.config.clone())
}

pub async fn upload(
    State(st): State<HttpState>,
    Form(req): Form<GradeRequest>,
) -> impl IntoResponse {
    match st.grading.grade_route(&req.img_url, &req.target_color).await {
        Ok(analysis) => Json(GradeResponse::from(analysis)).into_response(),
        Err(e @ DomainError::InvalidInput(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
