use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by a backend on create.
pub type RecordId = String;

/// The three record tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Meals,
    Dishes,
    Lates,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Meals => "meals",
            RecordKind::Dishes => "dishes",
            RecordKind::Lates => "lates",
        }
    }

    /// Field holding the parent id, for kinds that have a parent.
    pub fn parent_field(&self) -> Option<&'static str> {
        match self {
            RecordKind::Meals => None,
            RecordKind::Dishes | RecordKind::Lates => Some("meal_id"),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A meal service, e.g. "dinner" on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub datetime: i64,
}

/// A dish served at a meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub meal_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// How a late plate is left for the person who requested it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingMethod {
    #[default]
    Fridge,
    Table,
}

/// A request to set aside food from a meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Late {
    pub meal_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub serving_method: ServingMethod,
    #[serde(default)]
    pub dish_ids: Vec<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfilled: Option<bool>,
}

impl Late {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.unwrap_or(false)
    }

    pub fn is_fulfilled(&self) -> bool {
        self.fulfilled.unwrap_or(false)
    }
}

/// A record together with its backend id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: T,
}
