use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use super::freshness::ExpiryStatus;
use super::repo_types::{Ingredient, IngredientChanges, NewIngredient};
use super::summary::InventorySummary;

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<Date>,
}

/// Absent fields are left alone; `"expiry_date": null` clears the date.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIngredientRequest {
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub expiry_date: Option<Option<Date>>,
}

fn present<'de, D>(de: D) -> Result<Option<Option<Date>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Date>::deserialize(de).map(Some)
}

fn check_quantity(q: f64) -> Result<f64, String> {
    if q.is_finite() && q >= 0.0 {
        Ok(q)
    } else {
        Err("quantity must be a non-negative number".into())
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CreateIngredientRequest {
    pub fn validate(self) -> Result<NewIngredient, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("name is required".into());
        }
        Ok(NewIngredient {
            name,
            category: non_blank(self.category).unwrap_or_else(|| "other".into()),
            quantity: check_quantity(self.quantity)?,
            unit: non_blank(self.unit).unwrap_or_default(),
            expiry_date: self.expiry_date,
        })
    }
}

impl UpdateIngredientRequest {
    pub fn validate(self) -> Result<IngredientChanges, String> {
        let changes = IngredientChanges {
            quantity: self.quantity.map(check_quantity).transpose()?,
            unit: self.unit.map(|u| u.trim().to_string()),
            category: non_blank(self.category),
            expiry_date: self.expiry_date,
        };
        if changes.quantity.is_none()
            && changes.unit.is_none()
            && changes.category.is_none()
            && changes.expiry_date.is_none()
        {
            return Err("nothing to update".into());
        }
        Ok(changes)
    }
}

/// Ingredient as shown in lists, with its freshness on `today`.
#[derive(Debug, Serialize)]
pub struct IngredientView {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub status: ExpiryStatus,
    pub days_left: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub today: Date,
    #[serde(flatten)]
    pub counts: InventorySummary,
    pub waste_rate: f64,
    pub categories: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn create_trims_and_defaults() {
        let req: CreateIngredientRequest = serde_json::from_str(
            r#"{"name":"  Green onion ","quantity":2,"expiry_date":"2024-06-12"}"#,
        )
        .unwrap();
        let new = req.validate().unwrap();
        assert_eq!(new.name, "Green onion");
        assert_eq!(new.category, "other");
        assert_eq!(new.unit, "");
        assert_eq!(new.expiry_date, Some(date!(2024 - 06 - 12)));
    }

    #[test]
    fn create_rejects_blank_name_and_negative_quantity() {
        let blank = CreateIngredientRequest {
            name: "   ".into(),
            category: None,
            quantity: 1.0,
            unit: None,
            expiry_date: None,
        };
        assert!(blank.validate().is_err());

        let negative = CreateIngredientRequest {
            name: "milk".into(),
            category: None,
            quantity: -0.5,
            unit: None,
            expiry_date: None,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn malformed_date_is_rejected_at_parse_time() {
        let res = serde_json::from_str::<CreateIngredientRequest>(
            r#"{"name":"milk","quantity":1,"expiry_date":"2024-13-40"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent: UpdateIngredientRequest = serde_json::from_str(r#"{"quantity":3}"#).unwrap();
        assert_eq!(absent.expiry_date, None);

        let cleared: UpdateIngredientRequest =
            serde_json::from_str(r#"{"expiry_date":null}"#).unwrap();
        assert_eq!(cleared.expiry_date, Some(None));

        let set: UpdateIngredientRequest =
            serde_json::from_str(r#"{"expiry_date":"2024-07-01"}"#).unwrap();
        assert_eq!(set.expiry_date, Some(Some(date!(2024 - 07 - 01))));
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(UpdateIngredientRequest::default().validate().is_err());
        let clear_only = UpdateIngredientRequest {
            expiry_date: Some(None),
            ..Default::default()
        };
        assert!(clear_only.validate().is_ok());
    }
}
