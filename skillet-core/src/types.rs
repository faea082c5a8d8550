use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recipe categories, a fixed closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: &'static [Category] = &[
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Dessert,
        Category::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Lunch => "lunch",
            Category::Dinner => "dinner",
            Category::Dessert => "dessert",
            Category::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "breakfast" => Some(Category::Breakfast),
            "lunch" => Some(Category::Lunch),
            "dinner" => Some(Category::Dinner),
            "dessert" => Some(Category::Dessert),
            "snack" => Some(Category::Snack),
            _ => None,
        }
    }
}

/// A persisted recipe as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Recipe {
    /// Server-assigned, immutable.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub cook_time_minutes: u32,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Server-populated; points at the stored image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
}

/// The structured-fields blob sent inside the multipart `recipe` part.
///
/// Every schema field except the image travels here, so the server receives
/// a complete record on every submit (no partial-patch semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeFields {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub cook_time_minutes: u32,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing filter: at most one of search or category applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListFilter {
    All,
    Category(Category),
    Search(String),
}

impl ListFilter {
    /// Build a filter from raw query parts. Search takes precedence over
    /// category when both are given; an absent or "all" category means
    /// unfiltered. An unknown category name is an error rather than a
    /// widened filter, since the server would match nothing for it.
    pub fn from_parts(search: Option<&str>, category: Option<&str>) -> Result<Self, String> {
        if let Some(q) = search {
            let q = q.trim();
            if !q.is_empty() {
                return Ok(ListFilter::Search(q.to_string()));
            }
        }
        match category {
            Some(c) if c != "all" => match Category::from_str(c) {
                Some(cat) => Ok(ListFilter::Category(cat)),
                None => {
                    let allowed = Category::ALL
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    Err(format!("Unknown category: {} (expected one of: {}, or all)", c, allowed))
                }
            },
            _ => Ok(ListFilter::All),
        }
    }

    /// Query pairs for the listing request URL.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            ListFilter::All => Vec::new(),
            ListFilter::Category(c) => vec![("category", c.as_str().to_string())],
            ListFilter::Search(q) => vec![("search", q.clone())],
        }
    }
}
