use std::collections::HashSet;

use time::Date;

use super::dto::IngredientView;
use super::freshness::{days_left, ExpiryClassifier};
use super::repo_types::Ingredient;
use crate::recipes::gap::normalize_all;

/// Attaches status and days-left to each ingredient, keeping the input order.
pub fn annotate(
    classifier: &ExpiryClassifier,
    today: Date,
    ingredients: Vec<Ingredient>,
) -> Vec<IngredientView> {
    ingredients
        .into_iter()
        .map(|ingredient| IngredientView {
            status: classifier.classify(today, ingredient.expiry_date),
            days_left: days_left(today, ingredient.expiry_date),
            ingredient,
        })
        .collect()
}

/// Soonest expiry first; undated ingredients last, ties broken by name.
pub fn sort_by_expiry(ingredients: &mut [Ingredient]) {
    ingredients.sort_by(|a, b| {
        match (a.expiry_date, b.expiry_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| a.name.cmp(&b.name))
    });
}

/// Normalized names of the ingredients the user actually has some of.
/// Expired stock still counts; a quantity of zero does not.
pub fn held_names(ingredients: &[Ingredient]) -> HashSet<String> {
    normalize_all(
        ingredients
            .iter()
            .filter(|i| i.quantity > 0.0)
            .map(|i| i.name.as_str()),
    )
}

/// Ingredients due within `days` days of `today`, already-expired ones included.
pub fn expiring_within(today: Date, ingredients: Vec<Ingredient>, days: u32) -> Vec<Ingredient> {
    let mut out: Vec<Ingredient> = ingredients
        .into_iter()
        .filter(|i| matches!(days_left(today, i.expiry_date), Some(d) if d <= i64::from(days)))
        .collect();
    sort_by_expiry(&mut out);
    out
}
