//! Dish editing workflow: a [`TagSession`] bound to a dish record.

use session::{
    ExistingDish, SessionConfig, SessionError, SessionState, TagList, TagSession, Transition,
};
use store::{Dish, MealStore, RecordBackend, RecordId, RecordKind, StoreError};
use taxonomy::TagIndex;
use thiserror::Error;
use tracing::{debug, info};

/// Failures while opening or saving a dish.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
enum Target {
    New { meal_id: RecordId },
    Existing { dish_id: RecordId, meal_id: RecordId },
}

/// Edits one dish: tags follow the name through the session, and save writes
/// the result back to the store.
pub struct DishEditor<'a, B: RecordBackend> {
    store: &'a MealStore<B>,
    session: TagSession<'a>,
    target: Target,
}

impl<'a, B: RecordBackend> DishEditor<'a, B> {
    /// Opens an editor for a new dish served at `meal_id`.
    pub fn create(
        store: &'a MealStore<B>,
        index: &'a TagIndex,
        config: SessionConfig,
        meal_id: &str,
    ) -> Result<Self, EditorError> {
        if store.get_meal(meal_id)?.is_none() {
            return Err(StoreError::NotFound {
                kind: RecordKind::Meals,
                id: meal_id.to_string(),
            }
            .into());
        }
        debug!(meal_id, "dish_editor_create");
        Ok(Self {
            store,
            session: TagSession::start(index, config, None),
            target: Target::New {
                meal_id: meal_id.to_string(),
            },
        })
    }

    /// Opens an editor for a saved dish. Tags the saved name infers but the
    /// saved record lacks start out excluded.
    pub fn edit(
        store: &'a MealStore<B>,
        index: &'a TagIndex,
        config: SessionConfig,
        dish_id: &str,
    ) -> Result<Self, EditorError> {
        let stored = store.get_dish(dish_id)?.ok_or_else(|| StoreError::NotFound {
            kind: RecordKind::Dishes,
            id: dish_id.to_string(),
        })?;
        let dish = stored.record;
        debug!(dish_id, meal_id = %dish.meal_id, "dish_editor_edit");
        let existing = ExistingDish {
            name: dish.name,
            tags: dish.tags,
            description: dish.description,
        };
        Ok(Self {
            store,
            session: TagSession::start(index, config, Some(existing)),
            target: Target::Existing {
                dish_id: stored.id,
                meal_id: dish.meal_id,
            },
        })
    }

    pub fn session(&self) -> &TagSession<'a> {
        &self.session
    }

    pub fn displayed(&self) -> &TagList {
        self.session.displayed()
    }

    /// Id of the dish being edited, `None` until a new dish is saved.
    pub fn dish_id(&self) -> Option<&str> {
        match &self.target {
            Target::New { .. } => None,
            Target::Existing { dish_id, .. } => Some(dish_id),
        }
    }

    pub fn meal_id(&self) -> &str {
        match &self.target {
            Target::New { meal_id } | Target::Existing { meal_id, .. } => meal_id,
        }
    }

    pub fn on_name_changed(&mut self, name: &str) -> Result<&TagList, EditorError> {
        Ok(self.session.on_name_changed(name)?)
    }

    pub fn on_tag_added(&mut self, tag: &str) -> Result<&TagList, EditorError> {
        Ok(self.session.on_tag_added(tag)?)
    }

    pub fn on_tag_removed(&mut self, tag: &str) -> Result<&TagList, EditorError> {
        Ok(self.session.on_tag_removed(tag)?)
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), EditorError> {
        Ok(self.session.set_description(description)?)
    }

    /// Writes the dish and then closes the session, returning the dish id.
    ///
    /// The session stays open when the write fails (blank name, deleted
    /// record, backend error), so the caller can fix the problem and save
    /// again without losing edits.
    pub fn save(&mut self) -> Result<RecordId, EditorError> {
        match self.session.state() {
            SessionState::Active => {}
            SessionState::Uninitialized => {
                return Err(SessionError::NotInitialized {
                    transition: Transition::Save.as_str(),
                }
                .into());
            }
            SessionState::Closed(reason) => {
                return Err(SessionError::Closed {
                    transition: Transition::Save.as_str(),
                    reason,
                }
                .into());
            }
        }
        let dish = Dish {
            meal_id: self.meal_id().to_string(),
            name: self.session.name().to_string(),
            tags: self.session.displayed().to_vec(),
            description: self.session.description().map(str::to_string),
        };
        let id = match &self.target {
            Target::New { .. } => self.store.new_dish(&dish)?,
            Target::Existing { dish_id, .. } => {
                self.store.patch_dish(dish_id, &dish)?;
                dish_id.clone()
            }
        };
        self.target = Target::Existing {
            dish_id: id.clone(),
            meal_id: dish.meal_id,
        };
        self.session.save()?;
        info!(dish_id = %id, tags = dish.tags.len(), "dish_editor_saved");
        Ok(id)
    }

    pub fn cancel(&mut self) -> Result<(), EditorError> {
        Ok(self.session.cancel()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session::CloseReason;
    use store::{InMemoryBackend, Meal};

    fn store_with_meal() -> (MealStore<InMemoryBackend>, RecordId) {
        let store = MealStore::new(InMemoryBackend::new());
        let meal_id = store
            .new_meal(&Meal {
                name: "dinner".into(),
                datetime: 1_710_095_400_000,
            })
            .expect("meal");
        (store, meal_id)
    }

    #[test]
    fn create_then_save_writes_new_dish() {
        let (store, meal_id) = store_with_meal();
        let mut editor =
            DishEditor::create(&store, TagIndex::food(), SessionConfig::default(), &meal_id)
                .expect("open");
        assert!(editor.dish_id().is_none());
        editor.on_name_changed("tofu salad").expect("name");
        let id = editor.save().expect("save");

        assert_eq!(editor.dish_id(), Some(id.as_str()));
        let dish = store.get_dish(&id).expect("get").expect("present").record;
        assert_eq!(dish.meal_id, meal_id);
        assert_eq!(dish.name, "tofu salad");
        assert_eq!(dish.tags, ["tofu", "protein"]);
    }

    #[test]
    fn create_requires_existing_meal() {
        let store = MealStore::new(InMemoryBackend::new());
        let err = DishEditor::create(&store, TagIndex::food(), SessionConfig::default(), "nope")
            .err()
            .expect("missing meal");
        assert!(matches!(
            err,
            EditorError::Store(StoreError::NotFound {
                kind: RecordKind::Meals,
                ..
            })
        ));
    }

    #[test]
    fn edit_seeds_exclusions_from_saved_record() {
        let (store, meal_id) = store_with_meal();
        let dish_id = store
            .new_dish(&Dish {
                meal_id,
                name: "bean soup".into(),
                tags: vec!["bean".into()],
                description: Some("with lime".into()),
            })
            .expect("dish");

        let mut editor =
            DishEditor::edit(&store, TagIndex::food(), SessionConfig::default(), &dish_id)
                .expect("open");
        assert!(editor.session().excluded().contains("protein"));
        assert_eq!(editor.session().description(), Some("with lime"));

        editor.on_name_changed("bean and lentil soup").expect("name");
        assert_eq!(editor.displayed().as_slice(), ["bean", "lentil"]);
        assert_eq!(editor.save().expect("save"), dish_id);

        let dish = store.get_dish(&dish_id).expect("get").expect("present").record;
        assert_eq!(dish.name, "bean and lentil soup");
        assert_eq!(dish.tags, ["bean", "lentil"]);
        assert_eq!(dish.description.as_deref(), Some("with lime"));
    }

    #[test]
    fn edit_missing_dish_is_not_found() {
        let (store, _) = store_with_meal();
        let err = DishEditor::edit(&store, TagIndex::food(), SessionConfig::default(), "gone")
            .err()
            .expect("missing dish");
        assert_eq!(
            err,
            EditorError::Store(StoreError::NotFound {
                kind: RecordKind::Dishes,
                id: "gone".into()
            })
        );
    }

    #[test]
    fn blank_name_keeps_session_open() {
        let (store, meal_id) = store_with_meal();
        let mut editor =
            DishEditor::create(&store, TagIndex::food(), SessionConfig::default(), &meal_id)
                .expect("open");
        editor.on_name_changed("   ").expect("name");
        assert!(matches!(
            editor.save(),
            Err(EditorError::Store(StoreError::Validation(_)))
        ));
        assert_eq!(editor.session().state(), SessionState::Active);

        editor.on_name_changed("rice").expect("name");
        editor.save().expect("save");
        assert_eq!(store.dishes_for_meal(&meal_id).expect("query").len(), 1);
    }

    #[test]
    fn failed_write_keeps_edits_for_retry() {
        let (store, meal_id) = store_with_meal();
        let dish_id = store
            .new_dish(&Dish {
                meal_id: meal_id.clone(),
                name: "bean soup".into(),
                tags: vec!["bean".into()],
                description: None,
            })
            .expect("dish");
        let mut editor =
            DishEditor::edit(&store, TagIndex::food(), SessionConfig::default(), &dish_id)
                .expect("open");
        editor.on_name_changed("bean and lentil soup").expect("name");
        store.delete_dish(&dish_id).expect("delete");

        assert!(matches!(
            editor.save(),
            Err(EditorError::Store(StoreError::NotFound {
                kind: RecordKind::Dishes,
                ..
            }))
        ));
        assert_eq!(editor.session().state(), SessionState::Active);
        assert_eq!(editor.session().name(), "bean and lentil soup");
        assert_eq!(editor.displayed().as_slice(), ["bean", "lentil"]);

        // Retrying hits the same missing record instead of a closed session.
        assert!(matches!(
            editor.save(),
            Err(EditorError::Store(StoreError::NotFound { .. }))
        ));
        editor.cancel().expect("cancel");
        assert_eq!(
            editor.save().unwrap_err(),
            EditorError::Session(SessionError::Closed {
                transition: "save",
                reason: CloseReason::Cancelled
            })
        );
    }

    #[test]
    fn cancel_writes_nothing() {
        let (store, meal_id) = store_with_meal();
        let mut editor =
            DishEditor::create(&store, TagIndex::food(), SessionConfig::default(), &meal_id)
                .expect("open");
        editor.on_name_changed("steak").expect("name");
        editor.cancel().expect("cancel");

        assert!(store.dishes_for_meal(&meal_id).expect("query").is_empty());
        assert_eq!(
            editor.on_tag_added("x").unwrap_err(),
            EditorError::Session(SessionError::Closed {
                transition: "tag_added",
                reason: CloseReason::Cancelled
            })
        );
    }
}
