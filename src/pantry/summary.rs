use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use super::freshness::{ExpiryClassifier, ExpiryStatus};
use super::repo_types::Ingredient;

/// Per-status ingredient counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct InventorySummary {
    pub fresh: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub unknown: usize,
    pub total: usize,
}

impl InventorySummary {
    /// Tallies already-classified statuses. Order of `statuses` does not matter.
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ExpiryStatus>,
    {
        statuses.into_iter().fold(Self::default(), |mut acc, status| {
            match status {
                ExpiryStatus::Fresh => acc.fresh += 1,
                ExpiryStatus::ExpiringSoon => acc.expiring_soon += 1,
                ExpiryStatus::Expired => acc.expired += 1,
                ExpiryStatus::Unknown => acc.unknown += 1,
            }
            acc.total += 1;
            acc
        })
    }

    /// Share of expired stock, `0.0` for an empty pantry.
    pub fn waste_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.expired as f64 / self.total as f64
    }
}

pub fn summarize(
    classifier: &ExpiryClassifier,
    today: Date,
    ingredients: &[Ingredient],
) -> InventorySummary {
    InventorySummary::tally(
        ingredients
            .iter()
            .map(|i| classifier.classify(today, i.expiry_date)),
    )
}

/// Number of ingredients per category; blank categories are grouped under `"other"`.
pub fn category_counts(ingredients: &[Ingredient]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for i in ingredients {
        let key = match i.category.trim() {
            "" => "other".to_string(),
            c => c.to_string(),
        };
        *out.entry(key).or_insert(0) += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, OffsetDateTime};
    use uuid::Uuid;

    const TODAY: Date = date!(2024 - 06 - 10);

    fn ingredient(name: &str, category: &str, expiry: Option<Date>) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.into(),
            category: category.into(),
            quantity: 1.0,
            unit: "ea".into(),
            expiry_date: expiry,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn fridge() -> Vec<Ingredient> {
        vec![
            ingredient("milk", "dairy", Some(date!(2024 - 06 - 09))),
            ingredient("egg", "dairy", Some(date!(2024 - 06 - 12))),
            ingredient("rice", "grain", Some(date!(2025 - 01 - 01))),
            ingredient("salt", "", None),
            ingredient("tofu", "soy", Some(TODAY)),
            ingredient("kimchi", "fermented", Some(date!(2024 - 05 - 01))),
        ]
    }

    #[test]
    fn counts_every_bucket() {
        let s = summarize(&ExpiryClassifier::default(), TODAY, &fridge());
        assert_eq!(
            s,
            InventorySummary {
                fresh: 1,
                expiring_soon: 2,
                expired: 2,
                unknown: 1,
                total: 6,
            }
        );
        assert_eq!(s.fresh + s.expiring_soon + s.expired + s.unknown, s.total);
    }

    #[test]
    fn order_does_not_matter() {
        let c = ExpiryClassifier::default();
        let mut items = fridge();
        let expected = summarize(&c, TODAY, &items);

        items.reverse();
        assert_eq!(summarize(&c, TODAY, &items), expected);

        items.sort_by_key(|i| i.expiry_date);
        assert_eq!(summarize(&c, TODAY, &items), expected);

        items.rotate_left(2);
        assert_eq!(summarize(&c, TODAY, &items), expected);
    }

    #[test]
    fn empty_pantry_has_zero_waste() {
        let s = summarize(&ExpiryClassifier::default(), TODAY, &[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.waste_rate(), 0.0);
    }

    #[test]
    fn waste_rate_is_expired_share() {
        let s = summarize(&ExpiryClassifier::default(), TODAY, &fridge());
        assert!((s.waste_rate() - 2.0 / 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_is_not_counted_as_fresh() {
        let items = vec![ingredient("flour", "grain", None); 3];
        let s = summarize(&ExpiryClassifier::default(), TODAY, &items);
        assert_eq!(s.fresh, 0);
        assert_eq!(s.unknown, 3);
    }

    #[test]
    fn categories_group_blank_as_other() {
        let counts = category_counts(&fridge());
        assert_eq!(counts.get("dairy"), Some(&2));
        assert_eq!(counts.get("other"), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 6);
    }
}
