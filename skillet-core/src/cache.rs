//! Process-wide query cache.
//!
//! One cache instance is shared by every view. It is read by many
//! components and written only by fetches repopulating entries and by the
//! invalidation calls after a successful mutation. Invalidation marks
//! entries stale so the next read refetches; it never pushes data to
//! readers or blocks them, and nobody mutates a cached entry in place.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::{ListFilter, Recipe};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stale: bool,
}

impl<T> CacheEntry<T> {
    fn fresh(value: T) -> Self {
        Self {
            value,
            stale: false,
        }
    }
}

#[derive(Default)]
struct CacheInner {
    listings: HashMap<ListFilter, CacheEntry<Vec<Recipe>>>,
    recipes: HashMap<i64, CacheEntry<Recipe>>,
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub fresh_listings: usize,
    pub stale_listings: usize,
    pub fresh_recipes: usize,
    pub stale_recipes: usize,
}

/// Shared cache of listing queries (keyed by filter) and single-recipe
/// queries (keyed by id).
#[derive(Default)]
pub struct QueryCache {
    inner: RwLock<CacheInner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh cached listing for this exact filter, if any.
    pub fn get_listing(&self, filter: &ListFilter) -> Option<Vec<Recipe>> {
        let inner = self.read();
        inner
            .listings
            .get(filter)
            .filter(|e| !e.stale)
            .map(|e| e.value.clone())
    }

    pub fn put_listing(&self, filter: ListFilter, recipes: Vec<Recipe>) {
        self.write().listings.insert(filter, CacheEntry::fresh(recipes));
    }

    /// A fresh cached recipe, if any.
    pub fn get_recipe(&self, id: i64) -> Option<Recipe> {
        let inner = self.read();
        inner
            .recipes
            .get(&id)
            .filter(|e| !e.stale)
            .map(|e| e.value.clone())
    }

    pub fn put_recipe(&self, recipe: Recipe) {
        self.write()
            .recipes
            .insert(recipe.id, CacheEntry::fresh(recipe));
    }

    /// Mark every listing variant (unfiltered, per-category, per-search)
    /// stale.
    pub fn invalidate_listings(&self) {
        let mut inner = self.write();
        tracing::debug!(count = inner.listings.len(), "invalidating cached listings");
        for entry in inner.listings.values_mut() {
            entry.stale = true;
        }
    }

    /// Mark the single-recipe entry for `id` stale, if cached.
    pub fn invalidate_recipe(&self, id: i64) {
        if let Some(entry) = self.write().recipes.get_mut(&id) {
            tracing::debug!(id, "invalidating cached recipe");
            entry.stale = true;
        }
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.read();
        let mut stats = CacheStats::default();
        for entry in inner.listings.values() {
            if entry.stale {
                stats.stale_listings += 1;
            } else {
                stats.fresh_listings += 1;
            }
        }
        for entry in inner.recipes.values() {
            if entry.stale {
                stats.stale_recipes += 1;
            } else {
                stats.fresh_recipes += 1;
            }
        }
        stats
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.listings.clear();
        inner.recipes.clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CacheInner> {
        self.inner.read().expect("query cache lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CacheInner> {
        self.inner.write().expect("query cache lock poisoned")
    }
}
