//! The in-progress recipe draft and its repeated-field controller.

use chrono::{DateTime, Utc};

use crate::types::Recipe;

/// An ordered, dense sequence of text rows (ingredients or steps).
///
/// Indices are always `0..len()`, and the list never goes below one row:
/// removing the last remaining row is a silent no-op, so the UI can keep
/// addressing rows positionally without stale-index bugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList {
    items: Vec<String>,
}

impl FieldList {
    /// A list with a single blank row.
    pub fn new() -> Self {
        Self {
            items: vec![String::new()],
        }
    }

    /// Seed from existing rows. An empty input still yields one blank row.
    pub fn from_items(items: Vec<String>) -> Self {
        if items.is_empty() {
            Self::new()
        } else {
            Self { items }
        }
    }

    /// Insert a new blank row at the end.
    pub fn append(&mut self) {
        self.items.push(String::new());
    }

    /// Remove the row at `index`, shifting later rows down by one.
    ///
    /// A no-op when the list would become empty (hard floor, not an error)
    /// or when `index` is out of range.
    pub fn remove_at(&mut self, index: usize) {
        if self.items.len() > 1 && index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Replace the row at `index`. Length and order are unchanged; out of
    /// range is a no-op.
    pub fn update_at(&mut self, index: usize, value: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            *item = value.into();
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for FieldList {
    fn default() -> Self {
        Self::new()
    }
}

/// The optional binary image attached to a draft.
///
/// `Untouched` means the user never picked (or cleared their pick of) an
/// image in this editing session; the encoder then omits the image part so
/// an update does not clobber the server's existing `imageUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageField {
    Untouched,
    Attached {
        data: Vec<u8>,
        content_type: String,
        file_name: String,
    },
}

impl ImageField {
    pub fn is_attached(&self) -> bool {
        matches!(self, ImageField::Attached { .. })
    }
}

/// A transient, client-only recipe under edit.
///
/// `category` and `cook_time_minutes` hold the raw text the user typed so
/// the validator can report "must be a number" instead of coercing. The
/// existing recipe id, when editing, is tracked by the form session rather
/// than inside the draft.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub cook_time_minutes: String,
    pub ingredients: FieldList,
    pub steps: FieldList,
    pub notes: String,
    pub image: ImageField,
    pub created_at: DateTime<Utc>,
}

impl RecipeDraft {
    /// A fresh draft for a new recipe, with the stock defaults.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: "dinner".to_string(),
            cook_time_minutes: "30".to_string(),
            ingredients: FieldList::new(),
            steps: FieldList::new(),
            notes: String::new(),
            image: ImageField::Untouched,
            created_at: Utc::now(),
        }
    }

    /// Seed a draft from a fetched recipe for editing. The image starts
    /// untouched so the server's stored image survives an edit that never
    /// opens the image picker.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            category: recipe.category.as_str().to_string(),
            cook_time_minutes: recipe.cook_time_minutes.to_string(),
            ingredients: FieldList::from_items(recipe.ingredients.clone()),
            steps: FieldList::from_items(recipe.steps.clone()),
            notes: recipe.notes.clone().unwrap_or_default(),
            image: ImageField::Untouched,
            created_at: recipe.created_at,
        }
    }

    /// Attach (or replace) the image chosen this session.
    pub fn attach_image(
        &mut self,
        data: Vec<u8>,
        content_type: impl Into<String>,
        file_name: impl Into<String>,
    ) {
        self.image = ImageField::Attached {
            data,
            content_type: content_type.into(),
            file_name: file_name.into(),
        };
    }

    /// Clear a chosen image, returning the field to untouched.
    pub fn clear_image(&mut self) {
        self.image = ImageField::Untouched;
    }
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_grows_by_one() {
        let mut list = FieldList::new();
        assert_eq!(list.len(), 1);
        list.append();
        assert_eq!(list.len(), 2);
        assert_eq!(list.items(), &["", ""]);
    }

    #[test]
    fn remove_at_shifts_indices_down() {
        let mut list = FieldList::from_items(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ]);
        list.remove_at(0);
        assert_eq!(list.items(), &["b", "c"]);
        // "b" is now addressable at index 0.
        list.update_at(0, "B");
        assert_eq!(list.items(), &["B", "c"]);
    }

    #[test]
    fn removing_the_last_row_is_a_no_op() {
        let mut list = FieldList::new();
        list.remove_at(0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn floor_holds_under_any_op_sequence() {
        let mut list = FieldList::new();
        for i in 0..20 {
            if i % 3 == 0 {
                list.append();
            } else {
                list.remove_at(0);
            }
            assert!(list.len() >= 1);
        }
        // Drain back down; the floor still holds.
        for _ in 0..30 {
            list.remove_at(0);
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_out_of_range_is_a_no_op() {
        let mut list = FieldList::from_items(vec!["a".to_string(), "b".to_string()]);
        list.remove_at(5);
        assert_eq!(list.items(), &["a", "b"]);
    }

    #[test]
    fn update_does_not_change_length_or_order() {
        let mut list = FieldList::from_items(vec!["a".to_string(), "b".to_string()]);
        list.update_at(1, "beta");
        assert_eq!(list.items(), &["a", "beta"]);
    }

    #[test]
    fn draft_from_recipe_starts_with_image_untouched() {
        let recipe = crate::test_support::sample_recipe(7);
        let draft = RecipeDraft::from_recipe(&recipe);
        assert_eq!(draft.title, recipe.title);
        assert_eq!(draft.cook_time_minutes, recipe.cook_time_minutes.to_string());
        assert_eq!(draft.image, ImageField::Untouched);
    }

    #[test]
    fn clearing_an_attached_image_returns_to_untouched() {
        let mut draft = RecipeDraft::new();
        draft.attach_image(vec![1, 2, 3], "image/png", "photo.png");
        assert!(draft.image.is_attached());
        draft.clear_image();
        assert_eq!(draft.image, ImageField::Untouched);
    }
}
