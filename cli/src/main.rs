mod seed;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use skillet_core::{
    validate_image, CatalogClient, FieldList, FormSession, HttpRecipeApi, ListFilter, QueryCache,
    Recipe, SubmitError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "skillet")]
#[command(about = "Skillet recipe catalog CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes, optionally filtered by search or category
    List {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Search query (takes precedence over --category)
        #[arg(long)]
        search: Option<String>,
        /// Category filter: breakfast, lunch, dinner, dessert, snack, or all
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one recipe in full
    Show {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        id: i64,
    },
    /// Create a recipe
    Add {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// breakfast, lunch, dinner, dessert, or snack
        #[arg(long, default_value = "dinner")]
        category: String,
        /// Cook time in minutes
        #[arg(long, default_value = "30")]
        cook_time: String,
        /// Repeat for each ingredient, in order
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Repeat for each step, in order
        #[arg(long = "step")]
        steps: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Path to an image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit an existing recipe; only the given flags change
    Edit {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        cook_time: Option<String>,
        /// Replaces the whole ingredient list when given
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Replaces the whole step list when given
        #[arg(long = "step")]
        steps: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Path to a new image; omit to keep the stored one
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a recipe
    Delete {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        id: i64,
    },
    /// Populate the server with a few sample recipes
    Seed {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            server,
            search,
            category,
        } => {
            let catalog = catalog(&server)?;
            let filter = ListFilter::from_parts(search.as_deref(), category.as_deref())
                .map_err(anyhow::Error::msg)?;
            let recipes = catalog.listing(&filter).await?;
            if recipes.is_empty() {
                println!("No recipes found");
            }
            for recipe in recipes {
                println!(
                    "{:>4}  {:<30} {:<10} {:>4} min",
                    recipe.id,
                    recipe.title,
                    recipe.category.as_str(),
                    recipe.cook_time_minutes
                );
            }
        }
        Commands::Show { server, id } => {
            let catalog = catalog(&server)?;
            let recipe = catalog
                .recipe(id)
                .await
                .context("Failed to fetch recipe")?;
            print_recipe(&recipe);
        }
        Commands::Add {
            server,
            title,
            description,
            category,
            cook_time,
            ingredients,
            steps,
            notes,
            image,
        } => {
            let catalog = catalog(&server)?;
            let mut session = FormSession::create(catalog);
            {
                let draft = session.draft_mut();
                draft.title = title;
                draft.description = description;
                draft.category = category;
                draft.cook_time_minutes = cook_time;
                set_rows(&mut draft.ingredients, &ingredients);
                set_rows(&mut draft.steps, &steps);
                if let Some(notes) = notes {
                    draft.notes = notes;
                }
            }
            if let Some(path) = image {
                attach_image(&mut session, &path)?;
            }
            let recipe = submit(&session).await?;
            println!("Created recipe {}: {}", recipe.id, recipe.title);
        }
        Commands::Edit {
            server,
            id,
            title,
            description,
            category,
            cook_time,
            ingredients,
            steps,
            notes,
            image,
        } => {
            let catalog = catalog(&server)?;
            let existing = catalog
                .recipe(id)
                .await
                .context("Failed to fetch recipe")?;
            let mut session = FormSession::edit(catalog, &existing);
            {
                let draft = session.draft_mut();
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
                if let Some(category) = category {
                    draft.category = category;
                }
                if let Some(cook_time) = cook_time {
                    draft.cook_time_minutes = cook_time;
                }
                if !ingredients.is_empty() {
                    set_rows(&mut draft.ingredients, &ingredients);
                }
                if !steps.is_empty() {
                    set_rows(&mut draft.steps, &steps);
                }
                if let Some(notes) = notes {
                    draft.notes = notes;
                }
            }
            if let Some(path) = image {
                attach_image(&mut session, &path)?;
            }
            let recipe = submit(&session).await?;
            println!("Updated recipe {}: {}", recipe.id, recipe.title);
        }
        Commands::Delete { server, id } => {
            let catalog = catalog(&server)?;
            catalog.delete(id).await?;
            println!("Deleted recipe {}", id);
        }
        Commands::Seed { server } => {
            let catalog = catalog(&server)?;
            seed::seed(catalog).await?;
        }
    }

    Ok(())
}

fn catalog(server: &str) -> Result<CatalogClient> {
    let api = Arc::new(HttpRecipeApi::new(server)?);
    Ok(CatalogClient::new(api, Arc::new(QueryCache::new())))
}

/// Replace a list's rows with `values` through the controller operations,
/// so the floor and density invariants hold throughout.
fn set_rows(list: &mut FieldList, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        if i >= list.len() {
            list.append();
        }
        list.update_at(i, value.clone());
    }
    while list.len() > values.len().max(1) {
        list.remove_at(list.len() - 1);
    }
}

fn attach_image(session: &mut FormSession, path: &Path) -> Result<()> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read image file {}", path.display()))?;
    let content_type = match validate_image(&data) {
        Ok(content_type) => content_type,
        Err(message) => bail!("{}", message),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    session
        .draft_mut()
        .attach_image(data, content_type, file_name);
    Ok(())
}

async fn submit(session: &FormSession) -> Result<Recipe> {
    match session.submit().await {
        Ok(recipe) => Ok(recipe),
        Err(SubmitError::Invalid(errors)) => {
            eprintln!("The recipe has validation errors:");
            for (field, message) in &errors {
                eprintln!("  {}: {}", field, message);
            }
            bail!("recipe was not submitted");
        }
        Err(e) => Err(e.into()),
    }
}

fn print_recipe(recipe: &Recipe) {
    println!("#{} {}", recipe.id, recipe.title);
    println!(
        "{} · {} min · added {}",
        recipe.category.as_str(),
        recipe.cook_time_minutes,
        recipe.created_at.format("%Y-%m-%d")
    );
    if !recipe.description.is_empty() {
        println!("\n{}", recipe.description);
    }
    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }
    println!("\nSteps:");
    for (i, step) in recipe.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    if let Some(notes) = &recipe.notes {
        println!("\nNotes: {}", notes);
    }
    if let Some(image_url) = &recipe.image_url {
        println!("\nImage: {}", image_url);
    }
}
