use serde::Deserialize;
use time::{Date, Duration};
use uuid::Uuid;

use super::repo_types::{MealType, NewMealPlan};

/// Days shown when no `to` is given: a week starting at `from`.
pub const DEFAULT_SPAN_DAYS: i64 = 6;
/// Longest range one request may ask for.
pub const MAX_SPAN_DAYS: i64 = 92;

#[derive(Debug, Deserialize)]
pub struct CreateMealPlanRequest {
    pub recipe_id: Uuid,
    pub plan_date: Date,
    pub meal_type: MealType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateMealPlanRequest {
    pub fn validate(self) -> NewMealPlan {
        NewMealPlan {
            recipe_id: self.recipe_id,
            plan_date: self.plan_date,
            meal_type: self.meal_type,
            notes: self.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        }
    }
}

/// `GET /meal-plans?from=2024-06-10&to=2024-06-16`, both ends inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct MealPlanQuery {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl MealPlanQuery {
    /// Fills in defaults relative to `today` and checks the range.
    pub fn resolve(&self, today: Date) -> Result<(Date, Date), String> {
        let from = self.from.unwrap_or(today);
        let to = match self.to {
            Some(to) => to,
            None => from
                .checked_add(Duration::days(DEFAULT_SPAN_DAYS))
                .ok_or("from is out of range")?,
        };
        if to < from {
            return Err("to must not be before from".into());
        }
        if (to - from).whole_days() > MAX_SPAN_DAYS {
            return Err(format!("range must not exceed {MAX_SPAN_DAYS} days"));
        }
        Ok((from, to))
    }
}
