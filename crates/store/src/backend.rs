use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::records::{RecordId, RecordKind};
use crate::StoreError;

/// Untyped record body: a JSON object.
pub type Fields = Map<String, Value>;

/// Contract for the record storage collaborator.
///
/// Editing sessions never talk to a backend directly; the typed
/// [`MealStore`](crate::MealStore) wraps one of these.
pub trait RecordBackend: Send + Sync {
    /// Inserts a new record and returns its id.
    fn create_record(&self, kind: RecordKind, fields: Fields) -> Result<RecordId, StoreError>;
    /// Shallow-merges `fields` into an existing record.
    fn patch_record(&self, kind: RecordKind, id: &str, fields: Fields) -> Result<(), StoreError>;
    /// Removes a record.
    fn delete_record(&self, kind: RecordKind, id: &str) -> Result<(), StoreError>;
    /// Fetches a record by id.
    fn get_record(&self, kind: RecordKind, id: &str) -> Result<Option<Fields>, StoreError>;
    /// Current records whose parent field equals `parent_id`, oldest first.
    fn query_by_parent(
        &self,
        kind: RecordKind,
        parent_id: &str,
    ) -> Result<Vec<(RecordId, Fields)>, StoreError>;
    /// Visits every record of `kind`, oldest first.
    fn scan(
        &self,
        kind: RecordKind,
        visitor: &mut dyn FnMut(&str, &Fields) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;
}

struct Row {
    seq: u64,
    fields: Fields,
}

#[derive(Default)]
struct Tables {
    next_seq: u64,
    rows: HashMap<RecordKind, HashMap<RecordId, Row>>,
}

impl Tables {
    fn sorted(&self, kind: RecordKind) -> Vec<(&RecordId, &Row)> {
        let mut rows: Vec<_> = self
            .rows
            .get(&kind)
            .map(|table| table.iter().collect())
            .unwrap_or_default();
        rows.sort_by_key(|(_, row)| row.seq);
        rows
    }
}

/// An in-memory backend using a `RwLock` around per-kind `HashMap`s.
pub struct InMemoryBackend {
    tables: RwLock<Tables>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBackend for InMemoryBackend {
    fn create_record(&self, kind: RecordKind, fields: Fields) -> Result<RecordId, StoreError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let id = Uuid::new_v4().to_string();
        let seq = guard.next_seq;
        guard.next_seq += 1;
        guard
            .rows
            .entry(kind)
            .or_default()
            .insert(id.clone(), Row { seq, fields });
        Ok(id)
    }

    fn patch_record(&self, kind: RecordKind, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let row = guard
            .rows
            .get_mut(&kind)
            .and_then(|table| table.get_mut(id))
            .ok_or_else(|| StoreError::not_found(kind, id))?;
        for (key, value) in fields {
            row.fields.insert(key, value);
        }
        Ok(())
    }

    fn delete_record(&self, kind: RecordKind, id: &str) -> Result<(), StoreError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        guard
            .rows
            .get_mut(&kind)
            .and_then(|table| table.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(kind, id))
    }

    fn get_record(&self, kind: RecordKind, id: &str) -> Result<Option<Fields>, StoreError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard
            .rows
            .get(&kind)
            .and_then(|table| table.get(id))
            .map(|row| row.fields.clone()))
    }

    fn query_by_parent(
        &self,
        kind: RecordKind,
        parent_id: &str,
    ) -> Result<Vec<(RecordId, Fields)>, StoreError> {
        let parent_field = kind.parent_field().ok_or(StoreError::NoParent(kind))?;
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard
            .sorted(kind)
            .into_iter()
            .filter(|(_, row)| {
                row.fields.get(parent_field).and_then(Value::as_str) == Some(parent_id)
            })
            .map(|(id, row)| (id.clone(), row.fields.clone()))
            .collect())
    }

    fn scan(
        &self,
        kind: RecordKind,
        visitor: &mut dyn FnMut(&str, &Fields) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        for (id, row) in guard.sorted(kind) {
            visitor(id, &row.fields)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn create_get_patch_delete() {
        let backend = InMemoryBackend::new();
        let id = backend
            .create_record(RecordKind::Dishes, fields(json!({ "meal_id": "m1", "name": "stew" })))
            .expect("create");

        backend
            .patch_record(RecordKind::Dishes, &id, fields(json!({ "name": "beef stew" })))
            .expect("patch");
        let got = backend
            .get_record(RecordKind::Dishes, &id)
            .expect("get")
            .expect("present");
        assert_eq!(got.get("name"), Some(&json!("beef stew")));
        assert_eq!(got.get("meal_id"), Some(&json!("m1")));

        backend.delete_record(RecordKind::Dishes, &id).expect("delete");
        assert!(backend.get_record(RecordKind::Dishes, &id).expect("get").is_none());
        assert_eq!(
            backend.delete_record(RecordKind::Dishes, &id).unwrap_err(),
            StoreError::NotFound {
                kind: RecordKind::Dishes,
                id: id.clone()
            }
        );
    }

    #[test]
    fn query_by_parent_filters_and_keeps_creation_order() {
        let backend = InMemoryBackend::new();
        for (meal, name) in [("m1", "a"), ("m2", "b"), ("m1", "c")] {
            backend
                .create_record(RecordKind::Dishes, fields(json!({ "meal_id": meal, "name": name })))
                .expect("create");
        }
        let names: Vec<_> = backend
            .query_by_parent(RecordKind::Dishes, "m1")
            .expect("query")
            .into_iter()
            .map(|(_, f)| f["name"].clone())
            .collect();
        assert_eq!(names, [json!("a"), json!("c")]);
    }

    #[test]
    fn meals_have_no_parent() {
        let backend = InMemoryBackend::new();
        assert_eq!(
            backend.query_by_parent(RecordKind::Meals, "x").unwrap_err(),
            StoreError::NoParent(RecordKind::Meals)
        );
    }

    #[test]
    fn kinds_are_separate_tables() {
        let backend = InMemoryBackend::new();
        let id = backend
            .create_record(RecordKind::Meals, fields(json!({ "name": "lunch" })))
            .expect("create");
        assert!(backend.get_record(RecordKind::Dishes, &id).expect("get").is_none());
        assert!(matches!(
            backend.patch_record(RecordKind::Lates, &id, Fields::new()),
            Err(StoreError::NotFound { .. })
        ));
    }
}
