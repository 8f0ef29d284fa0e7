use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::gap::IngredientGapResult;
use super::repo_types::{NewCookingEntry, NewRecipe, Recipe, RecipeRequirement};

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub cooking_time_minutes: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeRequirement>,
}

impl CreateRecipeRequest {
    /// Trims text fields and drops ingredient lines without a name.
    pub fn validate(self) -> Result<NewRecipe, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("title is required".into());
        }
        if self.cooking_time_minutes.is_some_and(|m| m < 0) {
            return Err("cooking_time_minutes must not be negative".into());
        }
        if self.servings.is_some_and(|s| s <= 0) {
            return Err("servings must be positive".into());
        }

        let requirements = self
            .ingredients
            .into_iter()
            .filter_map(|r| {
                let name = r.name.trim().to_string();
                (!name.is_empty()).then(|| RecipeRequirement {
                    name,
                    quantity: r.quantity.trim().to_string(),
                    unit: r.unit.trim().to_string(),
                    is_essential: r.is_essential,
                })
            })
            .collect();

        Ok(NewRecipe {
            title,
            description: self.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            instructions: self
                .instructions
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cooking_time_minutes: self.cooking_time_minutes,
            servings: self.servings,
            difficulty: self.difficulty.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            requirements,
        })
    }
}

/// `GET /recipes?q=kimchi&difficulty=easy`; blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub q: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CookedRequest {
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CookedRequest {
    pub fn validate(self) -> Result<NewCookingEntry, String> {
        if self.rating.is_some_and(|r| !(1..=5).contains(&r)) {
            return Err("rating must be between 1 and 5".into());
        }
        Ok(NewCookingEntry {
            rating: self.rating,
            notes: self.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeRequirement>,
}

#[derive(Debug, Deserialize)]
pub struct GapQuery {
    /// Ask the AI advisor for substitutes; on by default.
    pub substitutes: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct GapResponse {
    pub recipe_id: Uuid,
    pub title: String,
    pub cookable: bool,
    #[serde(flatten)]
    pub gap: IngredientGapResult,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CookableItem {
    pub recipe_id: Uuid,
    pub title: String,
    pub essential_missing: usize,
    pub optional_missing: usize,
    pub cookable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_defaults_to_essential() {
        let req: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":"Kimchi stew","ingredients":[{"name":"kimchi"},{"name":"scallion","is_essential":false}]}"#,
        )
        .unwrap();
        let recipe = req.validate().unwrap();
        assert!(recipe.requirements[0].is_essential);
        assert!(!recipe.requirements[1].is_essential);
        assert_eq!(recipe.requirements[0].quantity, "");
    }

    #[test]
    fn blank_ingredient_names_are_dropped() {
        let req: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":" Omelette ","instructions":["beat eggs","  ","fry"],
                "ingredients":[{"name":"  "},{"name":" Egg ","quantity":"2","unit":"ea"}]}"#,
        )
        .unwrap();
        let recipe = req.validate().unwrap();
        assert_eq!(recipe.title, "Omelette");
        assert_eq!(recipe.instructions, vec!["beat eggs", "fry"]);
        assert_eq!(recipe.requirements.len(), 1);
        assert_eq!(recipe.requirements[0].name, "Egg");
    }

    #[test]
    fn quantity_is_kept_verbatim() {
        let req: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":"Tofu soup","ingredients":[{"name":"tofu","quantity":"1/2","unit":"block"}]}"#,
        )
        .unwrap();
        assert_eq!(req.validate().unwrap().requirements[0].quantity, "1/2");
    }

    #[test]
    fn numeric_quantity_becomes_text() {
        let req: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":"Rice","ingredients":[{"name":"rice","quantity":1.5},{"name":"water","quantity":2},{"name":"salt","quantity":null}]}"#,
        )
        .unwrap();
        let quantities: Vec<String> = req
            .validate()
            .unwrap()
            .requirements
            .into_iter()
            .map(|r| r.quantity)
            .collect();
        assert_eq!(quantities, vec!["1.5", "2", ""]);
    }

    #[test]
    fn rejects_blank_title_and_bad_numbers() {
        for body in [
            r#"{"title":"  "}"#,
            r#"{"title":"x","cooking_time_minutes":-5}"#,
            r#"{"title":"x","servings":0}"#,
        ] {
            let req: CreateRecipeRequest = serde_json::from_str(body).unwrap();
            assert!(req.validate().is_err(), "{body} should be rejected");
        }
    }

    #[test]
    fn cooked_rating_is_bounded() {
        for bad in [0, 6, -1] {
            let req = CookedRequest { rating: Some(bad), notes: None };
            assert!(req.validate().is_err(), "{bad} accepted");
        }
        let req: CookedRequest = serde_json::from_str(r#"{"rating":4,"notes":"  a bit salty "}"#).unwrap();
        assert_eq!(
            req.validate().unwrap(),
            NewCookingEntry { rating: Some(4), notes: Some("a bit salty".into()) }
        );
    }

    #[test]
    fn cooked_body_may_be_empty() {
        let req: CookedRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.validate().unwrap(), NewCookingEntry { rating: None, notes: None });
    }
}
