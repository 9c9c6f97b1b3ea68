//! # Meal records
//!
//! Storage for meals, the dishes served at them and late-plate requests.
//! Real deployments keep these in an external managed data layer; this crate
//! only pins down the contract that layer must offer ([`RecordBackend`]) and
//! ships an in-memory implementation for tests and local runs.
//!
//! ## Key Concepts
//!
//! - [`RecordBackend`]: untyped create / patch / delete / get plus
//!   `query_by_parent`, keyed by [`RecordKind`].
//! - [`MealStore`]: typed facade over a backend. Validates names and converts
//!   between [`Meal`], [`Dish`], [`Late`] and JSON fields.
//!
//! Queries return snapshots. Push-updated live queries belong to the
//! external layer.
//!
//! ```
//! use store::{Dish, InMemoryBackend, Meal, MealStore};
//!
//! let store = MealStore::new(InMemoryBackend::new());
//! let meal_id = store
//!     .new_meal(&Meal { name: "dinner".into(), datetime: 1_700_000_000_000 })
//!     .unwrap();
//! store
//!     .new_dish(&Dish {
//!         meal_id: meal_id.clone(),
//!         name: "bean soup".into(),
//!         tags: vec!["bean".into()],
//!         description: None,
//!     })
//!     .unwrap();
//! assert_eq!(store.dishes_for_meal(&meal_id).unwrap().len(), 1);
//! ```

mod backend;
mod error;
mod records;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

pub use crate::backend::{Fields, InMemoryBackend, RecordBackend};
pub use crate::error::StoreError;
pub use crate::records::{Dish, Late, Meal, RecordId, RecordKind, ServingMethod, Stored};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Typed access to meals, dishes and late requests.
pub struct MealStore<B> {
    backend: B,
}

impl<B: RecordBackend> MealStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn new_meal(&self, meal: &Meal) -> Result<RecordId, StoreError> {
        require_name("meal", &meal.name)?;
        let id = self
            .backend
            .create_record(RecordKind::Meals, to_fields(meal)?)?;
        info!(meal_id = %id, datetime = meal.datetime, "meal_created");
        Ok(id)
    }

    pub fn get_meal(&self, id: &str) -> Result<Option<Stored<Meal>>, StoreError> {
        self.get(RecordKind::Meals, id)
    }

    /// Meals on the calendar day containing `datetime` (epoch millis).
    ///
    /// The day runs from UTC midnight to the last millisecond before the
    /// next one, both shifted by `tz_offset_minutes`. Results are ordered by
    /// meal time.
    pub fn meals_for_date(
        &self,
        datetime: i64,
        tz_offset_minutes: i64,
    ) -> Result<Vec<Stored<Meal>>, StoreError> {
        let (start, end) = day_bounds(datetime, tz_offset_minutes)?;
        let mut meals = Vec::new();
        self.backend.scan(RecordKind::Meals, &mut |id, fields| {
            let meal: Meal = from_fields(fields)?;
            if (start..=end).contains(&meal.datetime) {
                meals.push(Stored {
                    id: id.to_string(),
                    record: meal,
                });
            }
            Ok(())
        })?;
        meals.sort_by_key(|stored| stored.record.datetime);
        debug!(start, end, found = meals.len(), "meals_for_date");
        Ok(meals)
    }

    pub fn new_dish(&self, dish: &Dish) -> Result<RecordId, StoreError> {
        require_name("dish", &dish.name)?;
        let id = self
            .backend
            .create_record(RecordKind::Dishes, to_fields(dish)?)?;
        info!(dish_id = %id, meal_id = %dish.meal_id, tags = dish.tags.len(), "dish_created");
        Ok(id)
    }

    pub fn get_dish(&self, id: &str) -> Result<Option<Stored<Dish>>, StoreError> {
        self.get(RecordKind::Dishes, id)
    }

    pub fn dishes_for_meal(&self, meal_id: &str) -> Result<Vec<Stored<Dish>>, StoreError> {
        self.children(RecordKind::Dishes, meal_id)
    }

    /// Replaces the editable fields of a dish.
    pub fn patch_dish(&self, id: &str, dish: &Dish) -> Result<(), StoreError> {
        require_name("dish", &dish.name)?;
        let mut fields = to_fields(dish)?;
        // An absent description must clear the stored one.
        fields.entry("description").or_insert(Value::Null);
        self.backend.patch_record(RecordKind::Dishes, id, fields)?;
        info!(dish_id = %id, tags = dish.tags.len(), "dish_patched");
        Ok(())
    }

    pub fn delete_dish(&self, id: &str) -> Result<(), StoreError> {
        self.backend.delete_record(RecordKind::Dishes, id)?;
        info!(dish_id = %id, "dish_deleted");
        Ok(())
    }

    pub fn new_late(&self, late: &Late) -> Result<RecordId, StoreError> {
        require_name("late", &late.name)?;
        let id = self
            .backend
            .create_record(RecordKind::Lates, to_fields(late)?)?;
        info!(late_id = %id, meal_id = %late.meal_id, dishes = late.dish_ids.len(), "late_created");
        Ok(id)
    }

    pub fn get_late(&self, id: &str) -> Result<Option<Stored<Late>>, StoreError> {
        self.get(RecordKind::Lates, id)
    }

    pub fn lates_for_meal(&self, meal_id: &str) -> Result<Vec<Stored<Late>>, StoreError> {
        self.children(RecordKind::Lates, meal_id)
    }

    pub fn patch_late(&self, id: &str, late: &Late) -> Result<(), StoreError> {
        require_name("late", &late.name)?;
        let mut fields = to_fields(late)?;
        fields.entry("description").or_insert(Value::Null);
        self.backend.patch_record(RecordKind::Lates, id, fields)?;
        info!(late_id = %id, dishes = late.dish_ids.len(), "late_patched");
        Ok(())
    }

    pub fn cancel_late(&self, id: &str) -> Result<(), StoreError> {
        self.set_late_cancelled(id, true)
    }

    pub fn set_late_cancelled(&self, id: &str, cancelled: bool) -> Result<(), StoreError> {
        self.set_late_flag(id, "cancelled", cancelled)
    }

    pub fn set_late_fulfilled(&self, id: &str, fulfilled: bool) -> Result<(), StoreError> {
        self.set_late_flag(id, "fulfilled", fulfilled)
    }

    fn set_late_flag(&self, id: &str, flag: &str, value: bool) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert(flag.to_string(), json!(value));
        self.backend.patch_record(RecordKind::Lates, id, fields)?;
        info!(late_id = %id, flag, value, "late_flag_set");
        Ok(())
    }

    fn get<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        id: &str,
    ) -> Result<Option<Stored<T>>, StoreError> {
        self.backend
            .get_record(kind, id)?
            .map(|fields| -> Result<Stored<T>, StoreError> {
                Ok(Stored {
                    id: id.to_string(),
                    record: from_fields(&fields)?,
                })
            })
            .transpose()
    }

    fn children<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        parent_id: &str,
    ) -> Result<Vec<Stored<T>>, StoreError> {
        self.backend
            .query_by_parent(kind, parent_id)?
            .into_iter()
            .map(|(id, fields)| -> Result<Stored<T>, StoreError> {
                Ok(Stored {
                    record: from_fields(&fields)?,
                    id,
                })
            })
            .collect()
    }
}

fn require_name(what: &str, name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation(format!("{what} name cannot be empty")));
    }
    Ok(())
}

fn to_fields<T: Serialize>(record: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Encoding(format!(
            "record serialized to non-object {other}"
        ))),
    }
}

fn from_fields<T: DeserializeOwned>(fields: &Fields) -> Result<T, StoreError> {
    // Null marks a cleared optional field.
    let cleaned: Fields = fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Ok(serde_json::from_value(Value::Object(cleaned))?)
}

fn day_bounds(datetime: i64, tz_offset_minutes: i64) -> Result<(i64, i64), StoreError> {
    let at = DateTime::<Utc>::from_timestamp_millis(datetime)
        .ok_or_else(|| StoreError::Validation(format!("datetime {datetime} out of range")))?;
    let offset = TimeDelta::try_minutes(tz_offset_minutes).ok_or_else(|| {
        StoreError::Validation(format!("timezone offset {tz_offset_minutes} out of range"))
    })?;
    let start = at
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| StoreError::Validation("invalid midnight".into()))?
        .and_utc()
        .checked_add_signed(offset)
        .ok_or_else(|| {
            StoreError::Validation(format!(
                "day of {datetime} shifted by {tz_offset_minutes} minutes is out of range"
            ))
        })?
        .timestamp_millis();
    let end = start
        .checked_add(DAY_MILLIS - 1)
        .ok_or_else(|| StoreError::Validation(format!("day of {datetime} is out of range")))?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-10T18:30:00Z
    const DINNER: i64 = 1_710_095_400_000;

    fn store() -> MealStore<InMemoryBackend> {
        MealStore::new(InMemoryBackend::new())
    }

    fn dish(meal_id: &str, name: &str, tags: &[&str]) -> Dish {
        Dish {
            meal_id: meal_id.into(),
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: None,
        }
    }

    #[test]
    fn dish_round_trip_through_backend() {
        let store = store();
        let meal_id = store
            .new_meal(&Meal {
                name: "dinner".into(),
                datetime: DINNER,
            })
            .expect("meal");
        let id = store
            .new_dish(&dish(&meal_id, "bean soup", &["bean"]))
            .expect("dish");

        let stored = store.get_dish(&id).expect("get").expect("present");
        assert_eq!(stored.id, id);
        assert_eq!(stored.record.tags, ["bean"]);
        assert_eq!(store.dishes_for_meal(&meal_id).expect("query").len(), 1);
        assert!(store.dishes_for_meal("other").expect("query").is_empty());
    }

    #[test]
    fn patch_clears_description() {
        let store = store();
        let mut d = dish("m", "toast", &[]);
        d.description = Some("buttered".into());
        let id = store.new_dish(&d).expect("dish");

        d.description = None;
        store.patch_dish(&id, &d).expect("patch");
        let stored = store.get_dish(&id).expect("get").expect("present");
        assert_eq!(stored.record.description, None);
    }

    #[test]
    fn empty_names_rejected() {
        let store = store();
        assert!(matches!(
            store.new_dish(&dish("m", "   ", &[])),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.new_meal(&Meal {
                name: String::new(),
                datetime: 0
            }),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn delete_dish_removes_it() {
        let store = store();
        let id = store.new_dish(&dish("m", "ziti", &["ziti"])).expect("dish");
        store.delete_dish(&id).expect("delete");
        assert!(store.get_dish(&id).expect("get").is_none());
        assert!(matches!(
            store.delete_dish(&id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn meals_for_date_uses_shifted_day() {
        let store = store();
        let hour = 60 * 60 * 1000;
        for (name, at) in [
            ("breakfast", DINNER - 12 * hour),
            ("dinner", DINNER),
            ("early breakfast", DINNER + 12 * hour),
        ] {
            store
                .new_meal(&Meal {
                    name: name.into(),
                    datetime: at,
                })
                .expect("meal");
        }

        let names = |meals: Vec<Stored<Meal>>| -> Vec<String> {
            meals.into_iter().map(|m| m.record.name).collect()
        };

        let utc = store.meals_for_date(DINNER, 0).expect("query");
        assert_eq!(names(utc), ["breakfast", "dinner"]);

        // Day shifted by +8h runs 08:00 -> 07:59 next day.
        let shifted = store.meals_for_date(DINNER, 8 * 60).expect("query");
        assert_eq!(names(shifted), ["dinner", "early breakfast"]);
    }

    #[test]
    fn meals_for_date_rejects_out_of_range_offset() {
        let store = store();
        assert!(matches!(
            store.meals_for_date(0, i64::MAX / 2),
            Err(StoreError::Validation(msg)) if msg.contains("timezone offset")
        ));
    }

    #[test]
    fn meals_for_date_rejects_shift_past_last_day() {
        let store = store();
        // Last millisecond chrono can represent.
        let last = 8_210_266_876_799_999;
        assert!(matches!(
            store.meals_for_date(last, 24 * 60),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.meals_for_date(i64::MAX, 0),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn late_lifecycle() {
        let store = store();
        let late = Late {
            meal_id: "m".into(),
            name: "Sam".into(),
            serving_method: ServingMethod::Table,
            dish_ids: vec!["d1".into()],
            description: None,
            cancelled: None,
            fulfilled: None,
        };
        let id = store.new_late(&late).expect("late");
        let stored = store.get_late(&id).expect("get").expect("present");
        assert!(!stored.record.is_cancelled());
        assert_eq!(stored.record.serving_method, ServingMethod::Table);

        store.cancel_late(&id).expect("cancel");
        store.set_late_fulfilled(&id, true).expect("fulfil");
        let stored = store.get_late(&id).expect("get").expect("present");
        assert!(stored.record.is_cancelled());
        assert!(stored.record.is_fulfilled());

        store.set_late_cancelled(&id, false).expect("uncancel");
        let lates = store.lates_for_meal("m").expect("query");
        assert_eq!(lates.len(), 1);
        assert!(!lates[0].record.is_cancelled());
    }
}
