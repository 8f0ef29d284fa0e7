//! Cooking log statistics.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use time::UtcOffset;
use uuid::Uuid;

use super::repo_types::CookingEntry;

/// How many favourites `cooking_stats` reports.
pub const TOP_RECIPES: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeCount {
    pub recipe_id: Uuid,
    pub title: String,
    pub times_cooked: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CookingStats {
    pub total_cooked: usize,
    /// Mean of the rated entries; `None` when nothing was rated.
    pub average_rating: Option<f64>,
    pub top_recipes: Vec<RecipeCount>,
    /// `"YYYY-MM"` in the household's offset -> times cooked.
    pub monthly: BTreeMap<String, usize>,
}

pub fn month_key(entry: &CookingEntry, offset: UtcOffset) -> String {
    let local = entry.cooked_at.to_offset(offset);
    format!("{:04}-{:02}", local.year(), u8::from(local.month()))
}

pub fn cooking_stats(entries: &[CookingEntry], offset: UtcOffset) -> CookingStats {
    let mut per_recipe: HashMap<Uuid, RecipeCount> = HashMap::new();
    let mut monthly = BTreeMap::new();
    let (mut rating_sum, mut rated) = (0i64, 0usize);

    for e in entries {
        per_recipe
            .entry(e.recipe_id)
            .or_insert_with(|| RecipeCount {
                recipe_id: e.recipe_id,
                title: e.recipe_title.clone(),
                times_cooked: 0,
            })
            .times_cooked += 1;
        *monthly.entry(month_key(e, offset)).or_insert(0) += 1;
        if let Some(r) = e.rating {
            rating_sum += i64::from(r);
            rated += 1;
        }
    }

    let mut top_recipes: Vec<RecipeCount> = per_recipe.into_values().collect();
    top_recipes.sort_by(|a, b| {
        b.times_cooked
            .cmp(&a.times_cooked)
            .then_with(|| a.title.cmp(&b.title))
    });
    top_recipes.truncate(TOP_RECIPES);

    CookingStats {
        total_cooked: entries.len(),
        average_rating: (rated > 0).then(|| rating_sum as f64 / rated as f64),
        top_recipes,
        monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, OffsetDateTime};

    fn entry(recipe_id: Uuid, title: &str, rating: Option<i32>, cooked_at: OffsetDateTime) -> CookingEntry {
        CookingEntry {
            id: Uuid::new_v4(),
            recipe_id,
            recipe_title: title.into(),
            rating,
            notes: None,
            cooked_at,
        }
    }

    #[test]
    fn empty_log_has_no_average() {
        let stats = cooking_stats(&[], UtcOffset::UTC);
        assert_eq!(stats, CookingStats::default());
    }

    #[test]
    fn counts_ranks_and_averages() {
        let stew = Uuid::new_v4();
        let rice = Uuid::new_v4();
        let entries = [
            entry(stew, "kimchi stew", Some(5), datetime!(2024-05-30 12:00 UTC)),
            entry(rice, "fried rice", None, datetime!(2024-06-01 12:00 UTC)),
            entry(stew, "kimchi stew", Some(4), datetime!(2024-06-02 12:00 UTC)),
            entry(rice, "fried rice", Some(3), datetime!(2024-06-03 12:00 UTC)),
            entry(stew, "kimchi stew", None, datetime!(2024-06-04 12:00 UTC)),
        ];
        let stats = cooking_stats(&entries, UtcOffset::UTC);

        assert_eq!(stats.total_cooked, 5);
        assert_eq!(stats.average_rating, Some(4.0));
        assert_eq!(stats.top_recipes[0].title, "kimchi stew");
        assert_eq!(stats.top_recipes[0].times_cooked, 3);
        assert_eq!(stats.top_recipes[1].times_cooked, 2);
        assert_eq!(stats.monthly.get("2024-05"), Some(&1));
        assert_eq!(stats.monthly.get("2024-06"), Some(&4));
    }

    #[test]
    fn month_follows_household_offset() {
        let late = entry(Uuid::new_v4(), "ramyeon", None, datetime!(2024-05-31 20:00 UTC));
        assert_eq!(month_key(&late, UtcOffset::UTC), "2024-05");
        let seoul = UtcOffset::from_hms(9, 0, 0).unwrap();
        assert_eq!(month_key(&late, seoul), "2024-06");
    }

    #[test]
    fn top_list_is_capped() {
        let entries: Vec<CookingEntry> = (0..TOP_RECIPES + 2)
            .map(|i| entry(Uuid::new_v4(), &format!("dish {i}"), None, datetime!(2024-06-01 00:00 UTC)))
            .collect();
        assert_eq!(cooking_stats(&entries, UtcOffset::UTC).top_recipes.len(), TOP_RECIPES);
    }
}
