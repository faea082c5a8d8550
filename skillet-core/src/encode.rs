//! Draft-to-wire encoding.
//!
//! A validated draft becomes a two-part payload: a JSON blob with every
//! structured field, and the binary image iff the user attached one this
//! session. Encoding borrows the draft and never mutates it.

use reqwest::multipart::{Form, Part};

use crate::draft::{ImageField, RecipeDraft};
use crate::error::EncodeError;
use crate::types::{Category, RecipeFields};

/// The binary image part of a payload.
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

/// A wire-transmittable recipe submission.
#[derive(Debug, Clone)]
pub struct RecipePayload {
    /// JSON-encoded [`RecipeFields`].
    pub recipe: String,
    /// Present iff the image was attached or replaced this session. When
    /// absent, an update leaves the server's stored image and `imageUrl`
    /// untouched.
    pub image: Option<ImagePart>,
}

impl RecipePayload {
    /// Convert into a multipart form with parts named `recipe` and `image`.
    pub fn into_multipart(self) -> reqwest::Result<Form> {
        let mut form = Form::new().text("recipe", self.recipe);
        if let Some(image) = self.image {
            let part = Part::bytes(image.data)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

/// Encode a draft. Callers run [`crate::validate::validate`] first; the
/// parses here only fail on drafts that never passed validation.
pub fn encode(draft: &RecipeDraft) -> Result<RecipePayload, EncodeError> {
    let category = Category::from_str(&draft.category).ok_or_else(|| EncodeError::InvalidField {
        field: "category",
        message: format!("unknown category: {}", draft.category),
    })?;

    let cook_time_minutes: u32 =
        draft
            .cook_time_minutes
            .trim()
            .parse()
            .map_err(|_| EncodeError::InvalidField {
                field: "cookTimeMinutes",
                message: format!("not a positive number: {}", draft.cook_time_minutes),
            })?;

    let fields = RecipeFields {
        title: draft.title.clone(),
        description: draft.description.clone(),
        category,
        cook_time_minutes,
        ingredients: draft.ingredients.items().to_vec(),
        steps: draft.steps.items().to_vec(),
        notes: if draft.notes.trim().is_empty() {
            None
        } else {
            Some(draft.notes.clone())
        },
        created_at: draft.created_at,
    };

    let image = match &draft.image {
        ImageField::Untouched => None,
        ImageField::Attached {
            data,
            content_type,
            file_name,
        } => Some(ImagePart {
            data: data.clone(),
            content_type: content_type.clone(),
            file_name: file_name.clone(),
        }),
    };

    Ok(RecipePayload {
        recipe: serde_json::to_string(&fields)?,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::valid_draft;

    #[test]
    fn untouched_image_is_omitted_from_the_payload() {
        let payload = encode(&valid_draft()).unwrap();
        assert!(payload.image.is_none());
    }

    #[test]
    fn attached_image_is_included_once() {
        let mut draft = valid_draft();
        draft.attach_image(vec![0xFF, 0xD8], "image/jpeg", "dish.jpg");
        let payload = encode(&draft).unwrap();
        let image = payload.image.unwrap();
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.data, vec![0xFF, 0xD8]);
    }

    #[test]
    fn blob_carries_every_structured_field_and_no_image() {
        let mut draft = valid_draft();
        draft.notes = "serve hot".to_string();
        let payload = encode(&draft).unwrap();

        let blob: serde_json::Value = serde_json::from_str(&payload.recipe).unwrap();
        assert_eq!(blob["title"], "Tea");
        assert_eq!(blob["category"], "dinner");
        assert_eq!(blob["cookTimeMinutes"], 5);
        assert_eq!(blob["ingredients"][0], "water");
        assert_eq!(blob["steps"][0], "boil");
        assert_eq!(blob["notes"], "serve hot");
        assert!(blob.get("createdAt").is_some());
        assert!(blob.get("image").is_none());
        assert!(blob.get("imageUrl").is_none());
    }

    #[test]
    fn blank_notes_become_none() {
        let mut draft = valid_draft();
        draft.notes = "  ".to_string();
        let payload = encode(&draft).unwrap();
        let blob: serde_json::Value = serde_json::from_str(&payload.recipe).unwrap();
        assert!(blob.get("notes").is_none());
    }

    #[test]
    fn encoding_is_deterministic_and_does_not_mutate() {
        let draft = valid_draft();
        let a = encode(&draft).unwrap();
        let b = encode(&draft).unwrap();
        assert_eq!(a.recipe, b.recipe);
        assert!(validate_unchanged(&draft));
    }

    fn validate_unchanged(draft: &crate::draft::RecipeDraft) -> bool {
        draft.title == "Tea" && draft.ingredients.items() == ["water"]
    }

    #[test]
    fn unparsed_fields_error_instead_of_panicking() {
        let mut draft = valid_draft();
        draft.category = "brunch".to_string();
        assert!(encode(&draft).is_err());
    }
}
