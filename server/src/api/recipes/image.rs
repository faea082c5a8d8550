use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/image",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Image bytes with their content type"),
        (status = 404, description = "No image stored for this recipe", body = ErrorResponse)
    )
)]
pub async fn get_image(State(store): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match store.image(id) {
        Some(image) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, image.content_type)],
            image.data,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Image not found")),
        )
            .into_response(),
    }
}
