pub mod api;
pub mod cache;
pub mod catalog;
pub mod draft;
pub mod encode;
pub mod error;
pub mod image;
pub mod types;
pub mod validate;

pub mod form;

pub use api::{HttpRecipeApi, MockApi, RecipeApi, RecordedPayload};
pub use cache::{CacheStats, QueryCache};
pub use catalog::CatalogClient;
pub use draft::{FieldList, ImageField, RecipeDraft};
pub use encode::{encode, ImagePart, RecipePayload};
pub use error::{ApiError, EncodeError, SubmitError};
pub use form::FormSession;
pub use image::{validate_image, ALLOWED_FORMATS, MAX_IMAGE_BYTES};
pub use types::{Category, ListFilter, Recipe, RecipeFields};
pub use validate::{validate, ErrorMap};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use crate::draft::RecipeDraft;
    use crate::encode::{encode, RecipePayload};
    use crate::types::{Category, Recipe};

    pub fn sample_recipe(id: i64) -> Recipe {
        Recipe {
            id,
            title: "Tea".to_string(),
            description: "Hot water with leaves".to_string(),
            category: Category::Dinner,
            cook_time_minutes: 5,
            ingredients: vec!["water".to_string()],
            steps: vec!["boil".to_string()],
            notes: None,
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    pub fn valid_draft() -> RecipeDraft {
        let mut draft = RecipeDraft::new();
        draft.title = "Tea".to_string();
        draft.cook_time_minutes = "5".to_string();
        draft.ingredients.update_at(0, "water");
        draft.steps.update_at(0, "boil");
        draft
    }

    pub fn sample_payload() -> RecipePayload {
        encode(&valid_draft()).expect("valid draft encodes")
    }
}
