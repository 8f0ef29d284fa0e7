use super::repo_types::{MealPlan, MealType};

/// Calendar order: by date, then breakfast to snack, then recipe title.
pub fn sort_plans(plans: &mut [MealPlan]) {
    plans.sort_by(|a, b| {
        a.plan_date
            .cmp(&b.plan_date)
            .then_with(|| MealType::rank(&a.meal_type).cmp(&MealType::rank(&b.meal_type)))
            .then_with(|| a.recipe_title.cmp(&b.recipe_title))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, Date, OffsetDateTime};
    use uuid::Uuid;

    fn plan(title: &str, plan_date: Date, meal_type: MealType) -> MealPlan {
        MealPlan {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            recipe_id: Uuid::new_v4(),
            recipe_title: title.into(),
            plan_date,
            meal_type: meal_type.as_str().into(),
            notes: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn orders_by_day_then_meal() {
        let mut plans = vec![
            plan("bibimbap", date!(2024 - 06 - 11), MealType::Lunch),
            plan("ramyeon", date!(2024 - 06 - 10), MealType::Snack),
            plan("toast", date!(2024 - 06 - 11), MealType::Breakfast),
            plan("kimchi stew", date!(2024 - 06 - 10), MealType::Dinner),
        ];
        sort_plans(&mut plans);
        let titles: Vec<&str> = plans.iter().map(|p| p.recipe_title.as_str()).collect();
        assert_eq!(titles, ["kimchi stew", "ramyeon", "toast", "bibimbap"]);
    }

    #[test]
    fn stored_names_match_rank() {
        for t in [MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack] {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json.trim_matches('"'), t.as_str());
        }
        assert!(MealType::rank("dinner") < MealType::rank("snack"));
        assert_eq!(MealType::rank("brunch"), u8::MAX);
    }
}
