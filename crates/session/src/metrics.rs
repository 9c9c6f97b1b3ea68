use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

/// Session transition kinds, for metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Initialize,
    NameChanged,
    TagAdded,
    TagRemoved,
    DescriptionChanged,
    Save,
    Cancel,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Initialize => "initialize",
            Transition::NameChanged => "name_changed",
            Transition::TagAdded => "tag_added",
            Transition::TagRemoved => "tag_removed",
            Transition::DescriptionChanged => "description_changed",
            Transition::Save => "save",
            Transition::Cancel => "cancel",
        }
    }
}

/// Metrics observer for session transitions.
pub trait SessionMetrics: Send + Sync {
    /// Called once per transition with its latency and whether it was accepted.
    fn record_transition(&self, transition: Transition, latency: Duration, accepted: bool);
    /// Called after a transition that changed the displayed tag count.
    fn record_displayed(&self, _displayed: usize) {}
}

/// Install or clear the global session metrics recorder.
pub fn set_session_metrics(recorder: Option<Arc<dyn SessionMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn SessionMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn SessionMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn SessionMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}
