use crate::api::recipes::validate_fields;
use crate::api::ErrorResponse;
use crate::store::StoredImage;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use skillet_core::{validate_image, Recipe, RecipeFields};
use utoipa::ToSchema;

/// Multipart shape shared by create and update.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecipeFormRequest {
    /// JSON-encoded [`RecipeFields`] blob.
    pub recipe: String,
    /// Binary image, only when the client attached or replaced one.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Read the `recipe` and `image` parts out of a multipart body.
///
/// The image bytes are format-sniffed here; the client-supplied content
/// type is ignored.
pub(crate) async fn read_recipe_form(
    mut multipart: Multipart,
) -> Result<(RecipeFields, Option<StoredImage>), Response> {
    let mut fields: Option<RecipeFields> = None;
    let mut image: Option<StoredImage> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Multipart read error: {}", e);
                let message = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    "Image too large. Maximum size is 5MB".to_string()
                } else {
                    format!("Failed to read multipart data: {}", e.body_text())
                };
                return Err((e.status(), Json(ErrorResponse::new(message))).into_response());
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "recipe" => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        return Err((
                            e.status(),
                            Json(ErrorResponse::new(format!(
                                "Failed to read recipe field: {}",
                                e.body_text()
                            ))),
                        )
                            .into_response())
                    }
                };
                match serde_json::from_str(&text) {
                    Ok(parsed) => fields = Some(parsed),
                    Err(e) => {
                        tracing::warn!("Invalid recipe blob: {}", e);
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse::new("Invalid recipe data")),
                        )
                            .into_response());
                    }
                }
            }
            "image" => {
                let data = match field.bytes().await {
                    Ok(bytes) => bytes.to_vec(),
                    Err(e) => {
                        let message = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                            "Image too large. Maximum size is 5MB".to_string()
                        } else {
                            format!("Failed to read image data: {}", e.body_text())
                        };
                        return Err(
                            (e.status(), Json(ErrorResponse::new(message))).into_response()
                        );
                    }
                };
                let content_type = match validate_image(&data) {
                    Ok(content_type) => content_type,
                    Err(message) => {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse::new(message)),
                        )
                            .into_response())
                    }
                };
                image = Some(StoredImage { data, content_type });
            }
            _ => {}
        }
    }

    let Some(fields) = fields else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing recipe field")),
        )
            .into_response());
    };

    if let Err(message) = validate_fields(&fields) {
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response());
    }

    Ok((fields, image))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = RecipeFormRequest),
    responses(
        (status = 201, description = "Recipe created successfully", body = Recipe),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_recipe(State(store): State<AppState>, multipart: Multipart) -> Response {
    let (fields, image) = match read_recipe_form(multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    let recipe = store.insert(fields, image);
    tracing::info!(id = recipe.id, title = %recipe.title, "recipe created");

    (StatusCode::CREATED, Json(recipe)).into_response()
}
