pub mod create;
pub mod delete;
pub mod get;
pub mod image;
pub mod list;
pub mod update;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use skillet_core::{RecipeFields, MAX_IMAGE_BYTES};
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/image", get(image::get_image))
        // Image cap plus headroom for the JSON part and multipart framing.
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 512 * 1024))
}

/// Server-side pass over a decoded fields blob. The client validates before
/// submitting, but the boundary re-checks everything it relies on.
pub(crate) fn validate_fields(fields: &RecipeFields) -> Result<(), String> {
    if fields.title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if fields.cook_time_minutes == 0 {
        return Err("Cook time must be a positive number".to_string());
    }
    if fields.ingredients.is_empty() || fields.ingredients.iter().any(|i| i.trim().is_empty()) {
        return Err("Ingredients cannot be empty".to_string());
    }
    if fields.steps.is_empty() || fields.steps.iter().any(|s| s.trim().is_empty()) {
        return Err("Steps cannot be empty".to_string());
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        image::get_image,
    ),
    components(schemas(create::RecipeFormRequest))
)]
pub struct ApiDoc;
