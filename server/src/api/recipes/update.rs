use crate::api::recipes::create::read_recipe_form;
use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use skillet_core::Recipe;

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    request_body(content_type = "multipart/form-data", content = super::create::RecipeFormRequest),
    responses(
        (status = 200, description = "Recipe updated successfully", body = Recipe),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(store): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let (fields, image) = match read_recipe_form(multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    // Full-record replace; an absent image part leaves the stored image and
    // imageUrl alone. Concurrent updates of the same id are last-write-wins.
    match store.update(id, fields, image) {
        Some(recipe) => {
            tracing::info!(id, "recipe updated");
            (StatusCode::OK, Json(recipe)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Recipe not found")),
        )
            .into_response(),
    }
}
