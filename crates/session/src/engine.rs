use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use taxonomy::{infer, normalize_name, AutoTagSet, TagIndex};
use tracing::{debug, info, warn};

use crate::metrics::{metrics_recorder, SessionMetrics, Transition};
use crate::types::{
    CloseReason, ExistingDish, SavedDish, SessionConfig, SessionError, SessionState, TagList,
};


/// One dish-editing interaction, from open to save or cancel.
///
/// The session owns three pieces of state: the current name, the displayed
/// tag list and the set of inferred tags the user has removed. Name edits
/// only ever add tags; tags leave the displayed list only through
/// [`on_tag_removed`](Self::on_tag_removed). Removing a tag that the current
/// name infers puts it in the exclusion set so later name edits do not bring
/// it back.
#[derive(Debug)]
pub struct TagSession<'i> {
    index: &'i TagIndex,
    config: SessionConfig,
    state: SessionState,
    name: String,
    description: Option<String>,
    displayed: TagList,
    auto: AutoTagSet,
    excluded: BTreeSet<String>,
}

impl<'i> TagSession<'i> {
    /// Creates a session that is still waiting for its initial values.
    pub fn pending(index: &'i TagIndex, config: SessionConfig) -> Self {
        Self {
            index,
            config,
            state: SessionState::Uninitialized,
            name: String::new(),
            description: None,
            displayed: TagList::new(),
            auto: AutoTagSet::new(),
            excluded: BTreeSet::new(),
        }
    }

    /// Creates and initializes a session in one step.
    ///
    /// `None` starts a new dish; `Some` edits a saved one.
    pub fn start(
        index: &'i TagIndex,
        config: SessionConfig,
        existing: Option<ExistingDish>,
    ) -> Self {
        let mut session = Self::pending(index, config);
        session.seed(existing);
        session
    }

    /// Moves a pending session to active.
    ///
    /// Every tag the saved name infers that is missing from the saved tags is
    /// treated as a standing exclusion.
    pub fn initialize(&mut self, existing: Option<ExistingDish>) -> Result<&TagList, SessionError> {
        let span = MetricsSpan::start();
        if let Err(err) = self.check_uninitialized() {
            warn!(error = %err, "session_invalid_transition");
            MetricsSpan::finish(span, Transition::Initialize, false, None);
            return Err(err);
        }
        self.seed(existing);
        MetricsSpan::finish(
            span,
            Transition::Initialize,
            true,
            Some(self.displayed.len()),
        );
        Ok(&self.displayed)
    }

    /// Re-infers tags for `name` and adds those not excluded.
    ///
    /// Tags already displayed stay displayed whatever the new name is.
    pub fn on_name_changed(&mut self, name: &str) -> Result<&TagList, SessionError> {
        let span = self.begin(Transition::NameChanged)?;
        self.name = name.to_string();
        self.auto = self.infer_current();
        let added = self.merge_auto();
        debug!(
            auto_tags = self.auto.len(),
            added,
            displayed = self.displayed.len(),
            "session_name_changed"
        );
        MetricsSpan::finish(
            span,
            Transition::NameChanged,
            true,
            Some(self.displayed.len()),
        );
        Ok(&self.displayed)
    }

    /// Removes `tag` from the displayed list.
    ///
    /// If the current name infers `tag`, it is excluded until the user adds it
    /// back by hand.
    pub fn on_tag_removed(&mut self, tag: &str) -> Result<&TagList, SessionError> {
        let span = self.begin(Transition::TagRemoved)?;
        let removed = self.displayed.remove(tag);
        let excluded = self.auto.contains(tag) && self.excluded.insert(tag.to_string());
        debug!(tag, removed, excluded, "session_tag_removed");
        MetricsSpan::finish(
            span,
            Transition::TagRemoved,
            true,
            Some(self.displayed.len()),
        );
        Ok(&self.displayed)
    }

    /// Adds a free-form `tag`, lifting any exclusion on it.
    pub fn on_tag_added(&mut self, tag: &str) -> Result<&TagList, SessionError> {
        let span = self.begin(Transition::TagAdded)?;
        let added = self.displayed.insert(tag);
        let unexcluded = self.excluded.remove(tag);
        debug!(tag, added, unexcluded, "session_tag_added");
        MetricsSpan::finish(
            span,
            Transition::TagAdded,
            true,
            Some(self.displayed.len()),
        );
        Ok(&self.displayed)
    }

    /// Replaces the free-text description. An empty string clears it.
    pub fn set_description(&mut self, description: &str) -> Result<(), SessionError> {
        let span = self.begin(Transition::DescriptionChanged)?;
        self.description = (!description.is_empty()).then(|| description.to_string());
        MetricsSpan::finish(span, Transition::DescriptionChanged, true, None);
        Ok(())
    }

    /// Closes the session and returns what should be persisted.
    ///
    /// The exclusion set does not survive the session.
    pub fn save(&mut self) -> Result<SavedDish, SessionError> {
        let span = self.begin(Transition::Save)?;
        let saved = SavedDish {
            name: std::mem::take(&mut self.name),
            tags: std::mem::take(&mut self.displayed).into(),
            description: self.description.take(),
        };
        self.close(CloseReason::Saved);
        info!(tags = saved.tags.len(), "session_saved");
        MetricsSpan::finish(span, Transition::Save, true, None);
        Ok(saved)
    }

    /// Closes the session without emitting anything.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        let span = self.begin(Transition::Cancel)?;
        self.name.clear();
        self.displayed = TagList::new();
        self.description = None;
        self.close(CloseReason::Cancelled);
        info!("session_cancelled");
        MetricsSpan::finish(span, Transition::Cancel, true, None);
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Closed(_))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn displayed(&self) -> &TagList {
        &self.displayed
    }

    /// Tags inferred from the current name, before exclusions.
    pub fn auto_tags(&self) -> &AutoTagSet {
        &self.auto
    }

    /// Inferred tags the user has chosen to suppress.
    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn seed(&mut self, existing: Option<ExistingDish>) {
        if let Some(dish) = existing {
            self.name = dish.name;
            self.description = dish.description.filter(|d| !d.is_empty());
            self.displayed = dish.tags.into();
            self.auto = self.infer_current();
            self.excluded = self
                .auto
                .iter()
                .filter(|tag| !self.displayed.contains(tag))
                .map(str::to_string)
                .collect();
        }
        self.state = SessionState::Active;
        debug!(
            displayed = self.displayed.len(),
            excluded = self.excluded.len(),
            "session_initialized"
        );
    }

    fn infer_current(&self) -> AutoTagSet {
        let name = normalize_name(&self.name, &self.config.normalize);
        infer(&name, self.index)
    }

    fn merge_auto(&mut self) -> usize {
        let mut added = 0;
        for tag in self.auto.iter() {
            if !self.excluded.contains(tag) && self.displayed.insert(tag) {
                added += 1;
            }
        }
        added
    }

    fn close(&mut self, reason: CloseReason) {
        self.auto = AutoTagSet::new();
        self.excluded.clear();
        self.state = SessionState::Closed(reason);
    }

    /// Starts metrics for `transition` and rejects it unless active.
    fn begin(&self, transition: Transition) -> Result<Option<MetricsSpan>, SessionError> {
        let span = MetricsSpan::start();
        let err = match self.state {
            SessionState::Active => return Ok(span),
            SessionState::Uninitialized => SessionError::NotInitialized {
                transition: transition.as_str(),
            },
            SessionState::Closed(reason) => SessionError::Closed {
                transition: transition.as_str(),
                reason,
            },
        };
        warn!(error = %err, "session_invalid_transition");
        MetricsSpan::finish(span, transition, false, None);
        Err(err)
    }

    fn check_uninitialized(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Uninitialized => Ok(()),
            SessionState::Active => Err(SessionError::AlreadyInitialized),
            SessionState::Closed(reason) => Err(SessionError::Closed {
                transition: Transition::Initialize.as_str(),
                reason,
            }),
        }
    }
}

struct MetricsSpan {
    recorder: Arc<dyn SessionMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn finish(
        span: Option<Self>,
        transition: Transition,
        accepted: bool,
        displayed: Option<usize>,
    ) {
        let Some(span) = span else {
            return;
        };
        span.recorder
            .record_transition(transition, span.start.elapsed(), accepted);
        if let Some(count) = displayed {
            span.recorder.record_displayed(count);
        }
    }
}
