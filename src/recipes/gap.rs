//! Recipe-vs-pantry gap matching.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use super::repo_types::RecipeRequirement;
use crate::advisor::{Substitute, SubstituteAdvisor, SubstituteRequest};

/// Which of a recipe's ingredients the user does not have.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct IngredientGapResult {
    pub essential_missing: BTreeSet<String>,
    pub optional_missing: BTreeSet<String>,
    pub substitutes: Vec<Substitute>,
}

impl IngredientGapResult {
    pub fn is_cookable(&self) -> bool {
        self.essential_missing.is_empty()
    }

    /// Every missing name, essential first.
    pub fn missing(&self) -> Vec<String> {
        self.essential_missing
            .iter()
            .chain(self.optional_missing.iter())
            .cloned()
            .collect()
    }
}

/// Key used to compare ingredient names: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn normalize_all<'a, I>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(normalize_name)
        .filter(|n| !n.is_empty())
        .collect()
}

/// Local set difference between `requirements` and what the user holds.
///
/// Names are compared by [`normalize_name`] but reported as the recipe
/// spells them (trimmed), first spelling per key. A name listed both as
/// essential and as optional is reported as essential only. Requirements
/// whose name is blank are ignored. Never produces substitutes.
pub fn diff(requirements: &[RecipeRequirement], held: &HashSet<String>) -> IngredientGapResult {
    let held: HashSet<String> = normalize_all(held.iter().map(String::as_str));
    let mut essential: BTreeMap<String, String> = BTreeMap::new();
    let mut optional: BTreeMap<String, String> = BTreeMap::new();

    for r in requirements {
        let key = normalize_name(&r.name);
        if key.is_empty() || held.contains(&key) {
            continue;
        }
        let bucket = if r.is_essential { &mut essential } else { &mut optional };
        bucket
            .entry(key)
            .or_insert_with(|| r.name.trim().to_string());
    }
    optional.retain(|key, _| !essential.contains_key(key));

    IngredientGapResult {
        essential_missing: essential.into_values().collect(),
        optional_missing: optional.into_values().collect(),
        substitutes: Vec::new(),
    }
}

/// [`diff`] plus advisor-provided substitutes for the missing names.
///
/// The advisor is only consulted when something is missing. Whatever it
/// returns is filtered down to entries naming one of the missing
/// ingredients; an absent answer leaves `substitutes` empty.
pub async fn diff_with_substitutes(
    requirements: &[RecipeRequirement],
    held: &HashSet<String>,
    recipe_title: &str,
    advisor: &dyn SubstituteAdvisor,
) -> IngredientGapResult {
    let mut gap = diff(requirements, held);
    let missing = gap.missing();
    if missing.is_empty() {
        return gap;
    }

    let mut held_list: Vec<String> = held.iter().cloned().collect();
    held_list.sort();

    let suggested = advisor
        .suggest(SubstituteRequest {
            recipe_title,
            missing: &missing,
            held: &held_list,
        })
        .await
        .unwrap_or_default();

    let missing_keys = normalize_all(missing.iter().map(String::as_str));
    gap.substitutes = suggested
        .into_iter()
        .filter(|s| !s.substitute.trim().is_empty())
        .filter(|s| missing_keys.contains(&normalize_name(&s.original)))
        .collect();
    gap
}
