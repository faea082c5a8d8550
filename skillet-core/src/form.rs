//! The form session: one draft, one submission at a time.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::catalog::CatalogClient;
use crate::draft::RecipeDraft;
use crate::encode::encode;
use crate::error::SubmitError;
use crate::types::Recipe;
use crate::validate::validate;

/// Resets the in-flight flag on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A single authoring session over one draft.
///
/// Holds the draft, the id of the recipe being edited (when any), and the
/// single-flight flag. Because the session owns `Arc`s to the API and the
/// cache via its [`CatalogClient`], a submission that resolves after the
/// owning view is gone still applies its cache invalidations safely.
pub struct FormSession {
    catalog: CatalogClient,
    draft: RecipeDraft,
    existing: Option<i64>,
    in_flight: AtomicBool,
}

impl FormSession {
    /// Start a session for a brand-new recipe.
    pub fn create(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            draft: RecipeDraft::new(),
            existing: None,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Start a session editing a fetched recipe. The recipe's id is tracked
    /// here, beside the draft, so submission knows to update rather than
    /// create.
    pub fn edit(catalog: CatalogClient, recipe: &Recipe) -> Self {
        Self {
            catalog,
            draft: RecipeDraft::from_recipe(recipe),
            existing: Some(recipe.id),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut RecipeDraft {
        &mut self.draft
    }

    /// The id of the recipe under edit, if this is an edit session.
    pub fn existing_id(&self) -> Option<i64> {
        self.existing
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit the draft: create when there is no existing id, update when
    /// there is one.
    ///
    /// The authoritative validation pass runs first; a non-empty error map
    /// blocks the call before the network is touched. While a submission is
    /// pending, further submits from this session are rejected (never
    /// queued). On failure the draft is left untouched so the user can
    /// retry; nothing retries automatically, since create is not
    /// idempotent. On success the listing caches are invalidated, and for
    /// an update the recipe's own entry too, so every open view converges
    /// on its next read.
    pub async fn submit(&self) -> Result<Recipe, SubmitError> {
        let errors = validate(&self.draft);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SubmitError::InFlight);
        }
        let _guard = FlightGuard(&self.in_flight);

        let payload = encode(&self.draft)?;

        let result = match self.existing {
            Some(id) => self.catalog.api().update(id, payload).await,
            None => self.catalog.api().create(payload).await,
        };

        match result {
            Ok(recipe) => {
                let cache = self.catalog.cache();
                cache.invalidate_listings();
                match self.existing {
                    Some(id) => {
                        cache.invalidate_recipe(id);
                        tracing::info!(id, "recipe updated");
                    }
                    None => {
                        tracing::info!(id = recipe.id, "recipe created");
                    }
                }
                Ok(recipe)
            }
            Err(e) => {
                tracing::warn!(error = %e, "submission failed, draft preserved");
                Err(SubmitError::Api(e))
            }
        }
    }
}
