//! Workspace umbrella crate for mealtag.
//!
//! Ties the food taxonomy, the tag editing session and the meal record store
//! together behind one import, and adds the pieces an application needs on
//! top: YAML configuration, tracing setup and [`DishEditor`], which binds an
//! editing session to a stored dish.
//!
//! ```
//! use mealtag::{DishEditor, InMemoryBackend, Meal, MealStore, SessionConfig, TagIndex};
//!
//! let store = MealStore::new(InMemoryBackend::new());
//! let meal_id = store
//!     .new_meal(&Meal { name: "lunch".into(), datetime: 1_700_000_000_000 })
//!     .unwrap();
//!
//! let mut editor =
//!     DishEditor::create(&store, TagIndex::food(), SessionConfig::default(), &meal_id).unwrap();
//! editor.on_name_changed("chicken ramen").unwrap();
//! editor.on_tag_removed("meat").unwrap();
//! let dish_id = editor.save().unwrap();
//!
//! let dish = store.get_dish(&dish_id).unwrap().unwrap().record;
//! assert!(dish.tags.contains(&"ramen".to_string()));
//! assert!(!dish.tags.contains(&"meat".to_string()));
//! ```

pub mod config;
pub mod editor;
pub mod logging;

pub use crate::config::{ConfigLoadError, InferenceConfig, LoggingConfig, MealtagConfig};
pub use crate::editor::{DishEditor, EditorError};
pub use crate::logging::init_tracing;

pub use session::{
    set_session_metrics, CloseReason, ExistingDish, SavedDish, SessionConfig, SessionError,
    SessionMetrics, SessionState, TagList, TagSession, Transition,
};
pub use store::{
    Dish, Fields, InMemoryBackend, Late, Meal, MealStore, RecordBackend, RecordId, RecordKind,
    ServingMethod, StoreError, Stored,
};
pub use taxonomy::{
    food_taxonomy, infer, leaf, leaves, node, normalize_name, AutoTagSet, NormalizeConfig,
    TagIndex, TaxonomyError, TaxonomyNode, FOOD_ROOT,
};
