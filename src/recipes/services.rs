use std::collections::{HashMap, HashSet};

use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

use super::dto::{CookableItem, RecipeListQuery};
use super::gap::{diff, normalize_all, normalize_name, IngredientGapResult};
use super::repo::RequirementRow;
use super::repo_types::{Recipe, RecipeRequirement};
use crate::shopping::repo_types::NewShoppingItem;

/// Menu roulette: one recipe chosen uniformly at random.
pub fn pick_random<'a, R: Rng + ?Sized>(recipes: &'a [Recipe], rng: &mut R) -> Option<&'a Recipe> {
    recipes.choose(rng)
}

/// Title search (case-insensitive substring) and exact difficulty match.
pub fn filter_recipes(recipes: Vec<Recipe>, query: &RecipeListQuery) -> Vec<Recipe> {
    let needle = query.q.as_deref().map(normalize_name).filter(|q| !q.is_empty());
    let difficulty = query
        .difficulty
        .as_deref()
        .map(normalize_name)
        .filter(|d| !d.is_empty());

    recipes
        .into_iter()
        .filter(|r| {
            needle
                .as_deref()
                .map_or(true, |q| r.title.to_lowercase().contains(q))
        })
        .filter(|r| {
            difficulty.as_deref().map_or(true, |d| {
                r.difficulty.as_deref().map(normalize_name).as_deref() == Some(d)
            })
        })
        .collect()
}

/// Gap size of every recipe against the same pantry, cookable ones first.
pub fn cookable_overview(
    recipes: &[Recipe],
    rows: Vec<RequirementRow>,
    held: &HashSet<String>,
) -> Vec<CookableItem> {
    let mut by_recipe: HashMap<Uuid, Vec<RecipeRequirement>> = HashMap::new();
    for row in rows {
        by_recipe.entry(row.recipe_id).or_default().push(row.requirement);
    }

    let mut out: Vec<CookableItem> = recipes
        .iter()
        .map(|recipe| {
            let reqs = by_recipe.get(&recipe.id).map(Vec::as_slice).unwrap_or(&[]);
            let gap = diff(reqs, held);
            CookableItem {
                recipe_id: recipe.id,
                title: recipe.title.clone(),
                essential_missing: gap.essential_missing.len(),
                optional_missing: gap.optional_missing.len(),
                cookable: gap.is_cookable(),
            }
        })
        .collect();

    out.sort_by(|a, b| {
        a.essential_missing
            .cmp(&b.essential_missing)
            .then(a.optional_missing.cmp(&b.optional_missing))
            .then_with(|| a.title.cmp(&b.title))
    });
    out
}

/// Shopping lines for the essential ingredients the gap reports missing,
/// carrying quantity and unit from the first matching requirement.
pub fn shopping_lines(
    recipe_id: Uuid,
    requirements: &[RecipeRequirement],
    gap: &IngredientGapResult,
) -> Vec<NewShoppingItem> {
    let mut pending = normalize_all(gap.essential_missing.iter().map(String::as_str));
    requirements
        .iter()
        .filter(|r| r.is_essential)
        .filter_map(|r| {
            pending.remove(&normalize_name(&r.name)).then(|| NewShoppingItem {
                name: r.name.trim().to_string(),
                quantity: r.quantity.clone(),
                unit: r.unit.clone(),
                recipe_id: Some(recipe_id),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use time::OffsetDateTime;

    fn recipe(title: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: title.into(),
            description: None,
            instructions: vec![],
            cooking_time_minutes: None,
            servings: None,
            difficulty: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn row(recipe: &Recipe, name: &str, is_essential: bool) -> RequirementRow {
        RequirementRow {
            recipe_id: recipe.id,
            requirement: RecipeRequirement {
                name: name.into(),
                quantity: String::new(),
                unit: String::new(),
                is_essential,
            },
        }
    }

    fn with_difficulty(title: &str, difficulty: &str) -> Recipe {
        Recipe {
            difficulty: Some(difficulty.into()),
            ..recipe(title)
        }
    }

    fn titles(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn filter_by_title_and_difficulty() {
        let all = vec![
            with_difficulty("Kimchi Stew", "easy"),
            with_difficulty("Kimchi Fried Rice", "Medium"),
            recipe("Bulgogi"),
        ];

        let q = RecipeListQuery { q: Some(" kimchi ".into()), difficulty: None };
        assert_eq!(titles(&filter_recipes(all.clone(), &q)), ["Kimchi Stew", "Kimchi Fried Rice"]);

        let q = RecipeListQuery { q: Some("kimchi".into()), difficulty: Some("medium".into()) };
        assert_eq!(titles(&filter_recipes(all.clone(), &q)), ["Kimchi Fried Rice"]);

        let blank = RecipeListQuery { q: Some("  ".into()), difficulty: Some(String::new()) };
        assert_eq!(filter_recipes(all, &blank).len(), 3);
    }

    #[test]
    fn roulette_on_empty_list_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_random(&[], &mut rng).is_none());
    }

    #[test]
    fn roulette_eventually_visits_every_recipe() {
        let recipes = vec![recipe("bibimbap"), recipe("japchae"), recipe("tteokbokki")];
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_random(&recipes, &mut rng).unwrap().id);
        }
        assert_eq!(seen.len(), recipes.len());
    }

    #[test]
    fn overview_puts_cookable_first() {
        let stew = recipe("kimchi stew");
        let omelette = recipe("omelette");
        let salad = recipe("salad");
        let rows = vec![
            row(&stew, "kimchi", true),
            row(&stew, "pork", true),
            row(&omelette, "egg", true),
            row(&omelette, "chive", false),
        ];
        let held: HashSet<String> = ["Kimchi", "egg"].iter().map(|s| s.to_string()).collect();

        let out = cookable_overview(&[stew.clone(), omelette.clone(), salad.clone()], rows, &held);
        let titles: Vec<&str> = out.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["salad", "omelette", "kimchi stew"]);
        assert!(out[0].cookable && out[1].cookable);
        assert_eq!(out[1].optional_missing, 1);
        assert!(!out[2].cookable);
        assert_eq!(out[2].essential_missing, 1);
    }

    #[test]
    fn shopping_lines_cover_essential_missing_once() {
        let recipe_id = Uuid::new_v4();
        let reqs = vec![
            RecipeRequirement { name: " Tofu ".into(), quantity: "1".into(), unit: "block".into(), is_essential: true },
            RecipeRequirement { name: "tofu".into(), quantity: "2".into(), unit: "block".into(), is_essential: true },
            RecipeRequirement { name: "Egg".into(), quantity: "2".into(), unit: "ea".into(), is_essential: true },
            RecipeRequirement { name: "Sesame".into(), quantity: "".into(), unit: "".into(), is_essential: false },
        ];
        let held: HashSet<String> = ["egg".to_string()].into_iter().collect();
        let gap = diff(&reqs, &held);

        let lines = shopping_lines(recipe_id, &reqs, &gap);
        assert_eq!(
            lines,
            vec![NewShoppingItem {
                name: "Tofu".into(),
                quantity: "1".into(),
                unit: "block".into(),
                recipe_id: Some(recipe_id),
            }]
        );
    }
}
