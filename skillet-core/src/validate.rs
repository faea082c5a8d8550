//! Field-level draft validation.
//!
//! `validate` is pure and deterministic: hosts re-run it on every change
//! event and diff the resulting map against the previous one to decide what
//! to re-render. The form session runs it once more, authoritatively,
//! immediately before submission.

use std::collections::BTreeMap;

use crate::draft::RecipeDraft;
use crate::types::Category;

/// Field path (e.g. `ingredients.2`) to human-readable message. Empty means
/// the draft is submittable. Ordered so error listings are stable.
pub type ErrorMap = BTreeMap<String, String>;

pub fn validate(draft: &RecipeDraft) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if draft.title.trim().is_empty() {
        errors.insert("title".to_string(), "Title is required".to_string());
    }

    if Category::from_str(&draft.category).is_none() {
        let allowed = Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        errors.insert(
            "category".to_string(),
            format!("Category must be one of: {}", allowed),
        );
    }

    // The encoder narrows to u32, so anything outside 1..=u32::MAX must be
    // caught here; a draft this pass accepts always encodes.
    match draft.cook_time_minutes.trim().parse::<i64>() {
        Err(_) => {
            errors.insert(
                "cookTimeMinutes".to_string(),
                "Cook time must be a number".to_string(),
            );
        }
        Ok(n) if n < 1 || n > u32::MAX as i64 => {
            errors.insert(
                "cookTimeMinutes".to_string(),
                "Cook time must be a positive number".to_string(),
            );
        }
        Ok(_) => {}
    }

    for (i, ingredient) in draft.ingredients.items().iter().enumerate() {
        if ingredient.trim().is_empty() {
            errors.insert(
                format!("ingredients.{}", i),
                "Ingredient cannot be empty".to_string(),
            );
        }
    }

    for (i, step) in draft.steps.items().iter().enumerate() {
        if step.trim().is_empty() {
            errors.insert(format!("steps.{}", i), "Step cannot be empty".to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::valid_draft;

    #[test]
    fn a_valid_draft_has_no_errors() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut draft = valid_draft();
        draft.title = "   ".to_string();
        let errors = validate(&draft);
        assert_eq!(errors.get("title").unwrap(), "Title is required");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut draft = valid_draft();
        draft.category = "brunch".to_string();
        let errors = validate(&draft);
        assert!(errors.get("category").unwrap().contains("must be one of"));
    }

    #[test]
    fn zero_cook_time_reports_positive_number() {
        // Draft {title: "Tea", category: "dinner", cookTimeMinutes: 0, ...}
        let mut draft = valid_draft();
        draft.title = "Tea".to_string();
        draft.cook_time_minutes = "0".to_string();
        let errors = validate(&draft);
        assert_eq!(
            errors.get("cookTimeMinutes").unwrap(),
            "Cook time must be a positive number"
        );
    }

    #[test]
    fn non_numeric_cook_time_reports_must_be_a_number() {
        let mut draft = valid_draft();
        draft.cook_time_minutes = "soon".to_string();
        let errors = validate(&draft);
        assert_eq!(
            errors.get("cookTimeMinutes").unwrap(),
            "Cook time must be a number"
        );
    }

    #[test]
    fn cook_time_beyond_the_wire_range_is_rejected() {
        // u32::MAX + 1: the encoder could never narrow this, so validation
        // has to flag it instead of letting submit fail unkeyed.
        let mut draft = valid_draft();
        draft.cook_time_minutes = "4294967296".to_string();
        let errors = validate(&draft);
        assert_eq!(
            errors.get("cookTimeMinutes").unwrap(),
            "Cook time must be a positive number"
        );

        // The largest value validation accepts still encodes.
        draft.cook_time_minutes = u32::MAX.to_string();
        assert!(validate(&draft).is_empty());
        assert!(crate::encode::encode(&draft).is_ok());
    }

    #[test]
    fn blank_rows_are_keyed_by_exact_index() {
        let mut draft = valid_draft();
        draft.ingredients.append();
        draft.steps.append();
        let errors = validate(&draft);
        assert!(errors.contains_key("ingredients.1"));
        assert!(errors.contains_key("steps.1"));
        assert!(!errors.contains_key("ingredients.0"));
    }
}
