//! REST client trait and implementations.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::encode::RecipePayload;
use crate::error::ApiError;
use crate::types::{ListFilter, Recipe, RecipeFields};

/// The REST boundary, as a trait for mockability in tests.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Recipe>, ApiError>;
    async fn get(&self, id: i64) -> Result<Recipe, ApiError>;
    async fn create(&self, payload: RecipePayload) -> Result<Recipe, ApiError>;
    async fn update(&self, id: i64, payload: RecipePayload) -> Result<Recipe, ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

/// Production client over reqwest.
pub struct HttpRecipeApi {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpRecipeApi {
    /// Create a client against a server base URL, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("skillet/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            inner,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Derive a failure from a non-2xx response: 404 is its own kind, and
    /// anything else carries the body's `message` field when one parses,
    /// else the per-operation fallback.
    async fn failure(response: reqwest::Response, fallback: &str) -> ApiError {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return ApiError::NotFound;
        }

        #[derive(Deserialize)]
        struct ServerMessage {
            message: String,
        }

        let message = response
            .json::<ServerMessage>()
            .await
            .map(|m| m.message)
            .unwrap_or_else(|_| fallback.to_string());

        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Recipe>, ApiError> {
        tracing::debug!(?filter, "GET /api/recipes");
        let response = self
            .inner
            .get(self.url("/api/recipes"))
            .query(&filter.query())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response, "Failed to fetch recipes").await);
        }
        Ok(response.json().await?)
    }

    async fn get(&self, id: i64) -> Result<Recipe, ApiError> {
        tracing::debug!(id, "GET /api/recipes/{id}");
        let response = self
            .inner
            .get(self.url(&format!("/api/recipes/{}", id)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response, "Failed to fetch recipe").await);
        }
        Ok(response.json().await?)
    }

    async fn create(&self, payload: RecipePayload) -> Result<Recipe, ApiError> {
        tracing::debug!(has_image = payload.image.is_some(), "POST /api/recipes");
        let form = payload.into_multipart()?;
        let response = self
            .inner
            .post(self.url("/api/recipes"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response, "Failed to create recipe").await);
        }
        Ok(response.json().await?)
    }

    async fn update(&self, id: i64, payload: RecipePayload) -> Result<Recipe, ApiError> {
        tracing::debug!(id, has_image = payload.image.is_some(), "PUT /api/recipes/{id}");
        let form = payload.into_multipart()?;
        let response = self
            .inner
            .put(self.url(&format!("/api/recipes/{}", id)))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response, "Failed to update recipe").await);
        }
        Ok(response.json().await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        tracing::debug!(id, "DELETE /api/recipes/{id}");
        let response = self
            .inner
            .delete(self.url(&format!("/api/recipes/{}", id)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response, "Failed to delete recipe").await);
        }
        Ok(())
    }
}

/// A payload as the mock observed it.
#[derive(Debug, Clone)]
pub struct RecordedPayload {
    /// The JSON blob from the `recipe` part.
    pub recipe: String,
    /// Whether the payload carried an image part.
    pub had_image: bool,
}

#[derive(Default)]
struct MockState {
    recipes: BTreeMap<i64, Recipe>,
    next_id: i64,
    fail: Option<String>,
    payloads: Vec<RecordedPayload>,
}

/// In-memory API for testing. Behaves like a tiny server: create assigns
/// ids, update preserves `createdAt` and the stored `imageUrl` when the
/// payload has no image part.
pub struct MockApi {
    state: Mutex<MockState>,
    latency: Option<Duration>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            latency: None,
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Seed a recipe into the mock's store.
    pub fn with_recipe(self, recipe: Recipe) -> Self {
        {
            let mut state = self.lock();
            state.next_id = state.next_id.max(recipe.id);
            state.recipes.insert(recipe.id, recipe);
        }
        self
    }

    /// Make every call fail with a server error carrying `message`.
    pub fn failing_with(self, message: &str) -> Self {
        self.lock().fail = Some(message.to_string());
        self
    }

    /// Add artificial latency before each call resolves, for tests that
    /// need a request to still be in flight when a second one arrives.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Every create/update payload seen, in order.
    pub fn recorded_payloads(&self) -> Vec<RecordedPayload> {
        self.lock().payloads.clone()
    }

    /// The mock's current copy of a recipe.
    pub fn recipe(&self, id: i64) -> Option<Recipe> {
        self.lock().recipes.get(&id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock poisoned")
    }

    async fn simulate(&self) -> Result<(), ApiError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.lock().fail {
            Some(message) => Err(ApiError::Server {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn record(&self, payload: &RecipePayload) {
        self.lock().payloads.push(RecordedPayload {
            recipe: payload.recipe.clone(),
            had_image: payload.image.is_some(),
        });
    }

    fn parse_fields(payload: &RecipePayload) -> Result<RecipeFields, ApiError> {
        serde_json::from_str(&payload.recipe).map_err(|e| ApiError::Server {
            status: 400,
            message: format!("Invalid recipe data: {}", e),
        })
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeApi for MockApi {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Recipe>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        let state = self.lock();
        let mut recipes: Vec<Recipe> = state
            .recipes
            .values()
            .filter(|r| match filter {
                ListFilter::All => true,
                ListFilter::Category(c) => r.category == *c,
                ListFilter::Search(q) => {
                    let q = q.to_lowercase();
                    r.title.to_lowercase().contains(&q)
                        || r.description.to_lowercase().contains(&q)
                }
            })
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(recipes)
    }

    async fn get(&self, id: i64) -> Result<Recipe, ApiError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        self.lock().recipes.get(&id).cloned().ok_or(ApiError::NotFound)
    }

    async fn create(&self, payload: RecipePayload) -> Result<Recipe, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        self.record(&payload);
        let fields = Self::parse_fields(&payload)?;

        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        let recipe = Recipe {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            cook_time_minutes: fields.cook_time_minutes,
            ingredients: fields.ingredients,
            steps: fields.steps,
            notes: fields.notes,
            image_url: payload
                .image
                .as_ref()
                .map(|_| format!("/api/recipes/{}/image", id)),
            created_at: fields.created_at,
        };
        state.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: i64, payload: RecipePayload) -> Result<Recipe, ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        self.record(&payload);
        let fields = Self::parse_fields(&payload)?;

        let mut state = self.lock();
        let existing = state.recipes.get(&id).cloned().ok_or(ApiError::NotFound)?;
        let recipe = Recipe {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            cook_time_minutes: fields.cook_time_minutes,
            ingredients: fields.ingredients,
            steps: fields.steps,
            notes: fields.notes,
            // No image part means the stored image is untouched.
            image_url: match payload.image {
                Some(_) => Some(format!("/api/recipes/{}/image", id)),
                None => existing.image_url,
            },
            created_at: existing.created_at,
        };
        state.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        match self.lock().recipes.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_payload, sample_recipe};
    use crate::types::Category;

    #[tokio::test]
    async fn mock_create_assigns_dense_ids() {
        let api = MockApi::new();
        let first = api.create(sample_payload()).await.unwrap();
        let second = api.create(sample_payload()).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(api.create_calls(), 2);
    }

    #[tokio::test]
    async fn mock_update_without_image_keeps_image_url() {
        let mut seeded = sample_recipe(7);
        seeded.image_url = Some("/api/recipes/7/image".to_string());
        let api = MockApi::new().with_recipe(seeded);

        let updated = api.update(7, sample_payload()).await.unwrap();
        assert_eq!(updated.image_url.as_deref(), Some("/api/recipes/7/image"));
    }

    #[tokio::test]
    async fn mock_list_filters_by_category() {
        let mut breakfast = sample_recipe(1);
        breakfast.category = Category::Breakfast;
        let api = MockApi::new()
            .with_recipe(breakfast)
            .with_recipe(sample_recipe(2));

        let hits = api
            .list(&ListFilter::Category(Category::Breakfast))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[tokio::test]
    async fn mock_get_missing_is_not_found() {
        let api = MockApi::new();
        assert!(matches!(api.get(99).await, Err(ApiError::NotFound)));
    }
}
