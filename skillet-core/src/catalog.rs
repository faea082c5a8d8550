//! Cache-through catalog reads and the delete mutation.
//!
//! `CatalogClient` is the façade every view shares: reads serve fresh
//! cached values and otherwise refetch through the API and repopulate the
//! cache. Create/update go through [`crate::form::FormSession`], which
//! applies the corresponding invalidations on success.

use std::sync::Arc;

use crate::api::RecipeApi;
use crate::cache::QueryCache;
use crate::error::ApiError;
use crate::types::{ListFilter, Recipe};

#[derive(Clone)]
pub struct CatalogClient {
    api: Arc<dyn RecipeApi>,
    cache: Arc<QueryCache>,
}

impl CatalogClient {
    pub fn new(api: Arc<dyn RecipeApi>, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &Arc<dyn RecipeApi> {
        &self.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// The recipe listing for `filter`: cached when fresh, refetched when
    /// absent or stale.
    pub async fn listing(&self, filter: &ListFilter) -> Result<Vec<Recipe>, ApiError> {
        if let Some(recipes) = self.cache.get_listing(filter) {
            tracing::debug!(?filter, "listing cache hit");
            return Ok(recipes);
        }

        tracing::debug!(?filter, "listing cache miss, fetching");
        let recipes = self.api.list(filter).await?;
        self.cache.put_listing(filter.clone(), recipes.clone());
        Ok(recipes)
    }

    /// A single recipe by id: cached when fresh, refetched when absent or
    /// stale. A missing id surfaces as [`ApiError::NotFound`].
    pub async fn recipe(&self, id: i64) -> Result<Recipe, ApiError> {
        if let Some(recipe) = self.cache.get_recipe(id) {
            tracing::debug!(id, "recipe cache hit");
            return Ok(recipe);
        }

        tracing::debug!(id, "recipe cache miss, fetching");
        let recipe = self.api.get(id).await?;
        self.cache.put_recipe(recipe.clone());
        Ok(recipe)
    }

    /// Delete a recipe, then mark the listings stale. A detail view open on
    /// the deleted id is the caller's responsibility to redirect.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(id).await?;
        tracing::info!(id, "recipe deleted");
        self.cache.invalidate_listings();
        Ok(())
    }
}
