use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use skillet_core::Recipe;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Case-insensitive match on title or description. Takes precedence
    /// over `category` when both are given.
    pub search: Option<String>,
    /// Category name, or "all" (same as absent) for no filter.
    pub category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes matching the filter, newest first", body = Vec<Recipe>)
    )
)]
pub async fn list_recipes(
    State(store): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let recipes = store.list(params.search.as_deref(), params.category.as_deref());
    (StatusCode::OK, Json(recipes))
}
