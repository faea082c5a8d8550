//! In-memory recipe store.
//!
//! Persistent storage is out of scope; recipes live for the process
//! lifetime behind one RwLock. Writers are last-write-wins, which is the
//! accepted behavior for concurrent updates of the same id.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use skillet_core::{Recipe, RecipeFields};

/// Stored image bytes with their sniffed content type.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone)]
struct StoredRecipe {
    recipe: Recipe,
    image: Option<StoredImage>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    recipes: BTreeMap<i64, StoredRecipe>,
}

#[derive(Default)]
pub struct RecipeStore {
    inner: RwLock<Inner>,
}

fn image_url(id: i64) -> String {
    format!("/api/recipes/{}/image", id)
}

impl RecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// List recipes, newest first. `search` matches title or description
    /// case-insensitively and takes precedence over `category`; an absent
    /// or "all" category means unfiltered.
    pub fn list(&self, search: Option<&str>, category: Option<&str>) -> Vec<Recipe> {
        let inner = self.read();
        let mut recipes: Vec<Recipe> = inner
            .recipes
            .values()
            .map(|s| &s.recipe)
            .filter(|r| {
                if let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) {
                    let q = q.to_lowercase();
                    return r.title.to_lowercase().contains(&q)
                        || r.description.to_lowercase().contains(&q);
                }
                match category {
                    Some(c) if c != "all" => r.category.as_str() == c,
                    _ => true,
                }
            })
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recipes
    }

    pub fn get(&self, id: i64) -> Option<Recipe> {
        self.read().recipes.get(&id).map(|s| s.recipe.clone())
    }

    /// Create a recipe, assigning the id, `createdAt`, and `imageUrl`.
    pub fn insert(&self, fields: RecipeFields, image: Option<StoredImage>) -> Recipe {
        let mut inner = self.write();
        inner.next_id += 1;
        let id = inner.next_id;

        let recipe = Recipe {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            cook_time_minutes: fields.cook_time_minutes,
            ingredients: fields.ingredients,
            steps: fields.steps,
            notes: fields.notes,
            image_url: image.as_ref().map(|_| image_url(id)),
            created_at: Utc::now(),
        };
        inner.recipes.insert(id, StoredRecipe {
            recipe: recipe.clone(),
            image,
        });
        recipe
    }

    /// Replace a recipe's fields wholesale, keeping `createdAt`. A `None`
    /// image keeps the stored image and `imageUrl` unchanged.
    pub fn update(
        &self,
        id: i64,
        fields: RecipeFields,
        image: Option<StoredImage>,
    ) -> Option<Recipe> {
        let mut inner = self.write();
        let stored = inner.recipes.get_mut(&id)?;

        let image_replaced = image.is_some();
        if let Some(image) = image {
            stored.image = Some(image);
        }

        let recipe = Recipe {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            cook_time_minutes: fields.cook_time_minutes,
            ingredients: fields.ingredients,
            steps: fields.steps,
            notes: fields.notes,
            image_url: if image_replaced {
                Some(image_url(id))
            } else {
                stored.recipe.image_url.clone()
            },
            created_at: stored.recipe.created_at,
        };
        stored.recipe = recipe.clone();
        Some(recipe)
    }

    pub fn remove(&self, id: i64) -> bool {
        self.write().recipes.remove(&id).is_some()
    }

    pub fn image(&self, id: i64) -> Option<StoredImage> {
        self.read().recipes.get(&id).and_then(|s| s.image.clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("store lock poisoned")
    }
}
