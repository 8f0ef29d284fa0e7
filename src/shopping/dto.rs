use serde::{Deserialize, Serialize};

use super::repo_types::{NewShoppingItem, ShoppingItem};
use crate::recipes::repo_types::quantity_text;

#[derive(Debug, Deserialize)]
pub struct CreateShoppingItemRequest {
    pub name: String,
    #[serde(default, deserialize_with = "quantity_text")]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

impl CreateShoppingItemRequest {
    pub fn validate(self) -> Result<NewShoppingItem, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("name is required".into());
        }
        Ok(NewShoppingItem {
            name,
            quantity: self.quantity.trim().to_string(),
            unit: self.unit.trim().to_string(),
            recipe_id: None,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateShoppingItemRequest {
    pub purchased: bool,
}

/// Result of pushing a recipe's missing ingredients to the list.
#[derive(Debug, Serialize)]
pub struct AddedFromRecipe {
    pub added: Vec<ShoppingItem>,
    /// Missing names already on the list, left untouched.
    pub already_listed: Vec<String>,
}
