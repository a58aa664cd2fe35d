use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::validate::Validator;

use super::repo_types::MenuItem;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
}

fn default_available() -> bool {
    true
}

impl CreateMenuItem {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(!self.name.trim().is_empty(), "name", "Name is required");
        v.check(
            !self.description.trim().is_empty(),
            "description",
            "Description is required",
        );
        v.check(
            self.price.is_finite() && self.price >= 0.0,
            "price",
            "Price must be a non-negative number",
        );
        v.check(
            !self.category.trim().is_empty(),
            "category",
            "Category is required",
        );
        v.finish()
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub available: Option<bool>,
    pub image_url: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
}

impl UpdateMenuItem {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.check(!name.trim().is_empty(), "name", "Name cannot be empty");
        }
        if let Some(price) = self.price {
            v.check(
                price.is_finite() && price >= 0.0,
                "price",
                "Price must be a non-negative number",
            );
        }
        if let Some(category) = &self.category {
            v.check(
                !category.trim().is_empty(),
                "category",
                "Category cannot be empty",
            );
        }
        v.finish()
    }
}

/// Sort orders accepted by the list endpoint; anything else is ignored.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort: Option<String>,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPage {
    pub items: Vec<MenuItem>,
    pub count: usize,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryItems {
    pub items: Vec<MenuItem>,
    pub count: usize,
    pub category: String,
}
