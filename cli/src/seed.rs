//! Sample data for a fresh server.

use anyhow::Result;
use skillet_core::{CatalogClient, FormSession};

struct Sample {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    cook_time: &'static str,
    ingredients: &'static [&'static str],
    steps: &'static [&'static str],
    notes: Option<&'static str>,
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Buttermilk Pancakes",
        description: "Fluffy weekend pancakes.",
        category: "breakfast",
        cook_time: "20",
        ingredients: &["2 cups flour", "2 cups buttermilk", "2 eggs", "1 tsp baking soda"],
        steps: &[
            "Whisk the dry ingredients together",
            "Fold in the buttermilk and eggs",
            "Cook on a hot griddle until bubbles form, then flip",
        ],
        notes: Some("Rest the batter 10 minutes for extra lift."),
    },
    Sample {
        title: "Tomato Soup",
        description: "Simple roasted tomato soup.",
        category: "lunch",
        cook_time: "45",
        ingredients: &["2 lbs tomatoes", "1 onion", "4 cloves garlic", "2 cups stock"],
        steps: &[
            "Roast the tomatoes, onion, and garlic",
            "Simmer with stock for 20 minutes",
            "Blend until smooth",
        ],
        notes: None,
    },
    Sample {
        title: "Chocolate Chip Cookies",
        description: "Chewy in the middle, crisp at the edges.",
        category: "dessert",
        cook_time: "25",
        ingredients: &[
            "1 cup butter",
            "1 cup brown sugar",
            "2 eggs",
            "2 1/4 cups flour",
            "2 cups chocolate chips",
        ],
        steps: &[
            "Cream the butter and sugar",
            "Beat in the eggs, then the flour",
            "Fold in the chips and bake at 375F for 10 minutes",
        ],
        notes: None,
    },
];

pub async fn seed(catalog: CatalogClient) -> Result<()> {
    for sample in SAMPLES {
        let mut session = FormSession::create(catalog.clone());
        {
            let draft = session.draft_mut();
            draft.title = sample.title.to_string();
            draft.description = sample.description.to_string();
            draft.category = sample.category.to_string();
            draft.cook_time_minutes = sample.cook_time.to_string();
            for (i, ingredient) in sample.ingredients.iter().enumerate() {
                if i >= draft.ingredients.len() {
                    draft.ingredients.append();
                }
                draft.ingredients.update_at(i, *ingredient);
            }
            for (i, step) in sample.steps.iter().enumerate() {
                if i >= draft.steps.len() {
                    draft.steps.append();
                }
                draft.steps.update_at(i, *step);
            }
            if let Some(notes) = sample.notes {
                draft.notes = notes.to_string();
            }
        }
        let recipe = session.submit().await?;
        println!("Seeded recipe {}: {}", recipe.id, recipe.title);
    }
    Ok(())
}
