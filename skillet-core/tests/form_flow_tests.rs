//! End-to-end authoring flows against the mock API: draft editing through
//! the list controller, validation gating, submission, and cache
//! convergence across views.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use skillet_core::{
    ApiError, CatalogClient, Category, FormSession, ListFilter, MockApi, QueryCache, Recipe,
};

fn seeded_recipe(id: i64, title: &str, image_url: Option<&str>) -> Recipe {
    Recipe {
        id,
        title: title.to_string(),
        description: String::new(),
        category: Category::Dinner,
        cook_time_minutes: 20,
        ingredients: vec!["salt".to_string()],
        steps: vec!["season".to_string()],
        notes: None,
        image_url: image_url.map(|s| s.to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn catalog_with(api: MockApi) -> (CatalogClient, Arc<MockApi>) {
    let api = Arc::new(api);
    let catalog = CatalogClient::new(api.clone(), Arc::new(QueryCache::new()));
    (catalog, api)
}

#[tokio::test]
async fn create_flow_from_blank_draft_to_converged_listing() {
    let (catalog, api) = catalog_with(MockApi::new());

    // A grid view has already populated the listing cache.
    assert_eq!(catalog.listing(&ListFilter::All).await.unwrap().len(), 0);
    assert_eq!(api.list_calls(), 1);

    let mut session = FormSession::create(catalog.clone());

    // First submit attempt: the blank draft is rejected locally.
    assert!(session.submit().await.is_err());
    assert_eq!(api.create_calls(), 0);

    // Fill the form the way a user would, through the list controller.
    let draft = session.draft_mut();
    draft.title = "Pancakes".to_string();
    draft.category = "breakfast".to_string();
    draft.cook_time_minutes = "15".to_string();
    draft.ingredients.update_at(0, "2 cups flour");
    draft.ingredients.append();
    draft.ingredients.update_at(1, "2 eggs");
    draft.steps.update_at(0, "Mix the flour and eggs");
    draft.steps.append();
    draft.steps.update_at(1, "Fry until golden");

    let created = session.submit().await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.ingredients, vec!["2 cups flour", "2 eggs"]);
    assert!(created.image_url.is_none());

    // No image was attached, so the payload had no image part.
    let payloads = api.recorded_payloads();
    assert_eq!(payloads.len(), 1);
    assert!(!payloads[0].had_image);

    // The grid's next read refetches and sees the new recipe.
    let listing = catalog.listing(&ListFilter::All).await.unwrap();
    assert_eq!(api.list_calls(), 2);
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].title, "Pancakes");
}

#[tokio::test]
async fn edit_flow_title_only_keeps_the_stored_image() {
    let seeded = seeded_recipe(7, "Soup", Some("/api/recipes/7/image"));
    let (catalog, api) = catalog_with(MockApi::new().with_recipe(seeded));

    // A detail view is open on id 7, and the grid has a listing cached.
    catalog.listing(&ListFilter::All).await.unwrap();
    let fetched = catalog.recipe(7).await.unwrap();

    let mut session = FormSession::edit(catalog.clone(), &fetched);
    assert_eq!(session.existing_id(), Some(7));
    session.draft_mut().title = "Hearty soup".to_string();

    let updated = session.submit().await.unwrap();
    assert_eq!(updated.title, "Hearty soup");
    // The image was never touched this session, so the server's imageUrl
    // survived the full-record update.
    assert_eq!(updated.image_url.as_deref(), Some("/api/recipes/7/image"));
    assert!(!api.recorded_payloads()[0].had_image);

    // Both the listing and the id=7 entry were marked stale; the open
    // views converge on their next read.
    let stats = catalog.cache().stats();
    assert_eq!(stats.stale_listings, 1);
    assert_eq!(stats.stale_recipes, 1);

    let refreshed = catalog.recipe(7).await.unwrap();
    assert_eq!(api.get_calls(), 2);
    assert_eq!(refreshed.title, "Hearty soup");
}

#[tokio::test]
async fn attaching_an_image_sends_exactly_one_image_part() {
    let (catalog, api) = catalog_with(MockApi::new());

    let mut session = FormSession::create(catalog.clone());
    let draft = session.draft_mut();
    draft.title = "Toast".to_string();
    draft.cook_time_minutes = "5".to_string();
    draft.ingredients.update_at(0, "bread");
    draft.steps.update_at(0, "toast it");
    draft.attach_image(vec![0xFF, 0xD8, 0xFF], "image/jpeg", "toast.jpg");

    let created = session.submit().await.unwrap();
    assert_eq!(
        created.image_url.as_deref(),
        Some("/api/recipes/1/image")
    );
    assert!(api.recorded_payloads()[0].had_image);
}

#[tokio::test]
async fn fetch_for_edit_on_a_missing_id_is_terminal() {
    let (catalog, _api) = catalog_with(MockApi::new());

    // The edit page redirects back instead of retrying.
    let err = catalog.recipe(404).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    assert_eq!(err.to_string(), "Recipe not found");
}

#[tokio::test]
async fn delete_from_the_detail_page_converges_the_grid() {
    let (catalog, api) = catalog_with(
        MockApi::new()
            .with_recipe(seeded_recipe(1, "Soup", None))
            .with_recipe(seeded_recipe(2, "Stew", None)),
    );

    assert_eq!(catalog.listing(&ListFilter::All).await.unwrap().len(), 2);

    catalog.delete(1).await.unwrap();

    let listing = catalog.listing(&ListFilter::All).await.unwrap();
    assert_eq!(api.list_calls(), 2);
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].title, "Stew");
}
