//! Wizard session - Step-gated state machine over an intake draft
//!
//! States are `Step(i)` for every configured step plus the terminal
//! `Complete`. Forward moves are gated by the current step's predicate,
//! backward moves never lose data, and nothing leaves `Complete`.

use chrono::Weekday;
use serde::Serialize;

use crate::domain::entities::draft_store::FormDraftStore;
use crate::domain::entities::intake_draft::{DaysPreset, DraftUpdate, IntakeDraft};
use crate::domain::services::step_validation::{IntakeFlow, StepId};
use crate::domain::value_objects::{ErrorKind, LocationResult};

/// A step descriptor; the predicate lives on the step id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub label: String,
}

impl Step {
    pub fn is_satisfied(&self, draft: &IntakeDraft) -> bool {
        self.id.is_satisfied(draft)
    }
}

impl From<StepId> for Step {
    fn from(id: StepId) -> Self {
        Self {
            id,
            label: id.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum WizardState {
    Step(usize),
    Complete,
}

/// One intake wizard and the draft it owns
#[derive(Debug, Clone)]
pub struct WizardSession {
    steps: Vec<Step>,
    /// `steps.len()` means complete
    current_index: usize,
    store: FormDraftStore,
    last_error: Option<ErrorKind>,
    notice: Option<String>,
}

impl WizardSession {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            current_index: 0,
            store: FormDraftStore::new(),
            last_error: None,
            notice: None,
        }
    }

    pub fn for_flow(flow: IntakeFlow) -> Self {
        Self::new(flow.steps())
    }

    pub fn state(&self) -> WizardState {
        if self.is_complete() {
            WizardState::Complete
        } else {
            WizardState::Step(self.current_index)
        }
    }

    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.steps.len()
    }

    /// True on the last step before `Complete`
    pub fn is_final_step(&self) -> bool {
        !self.is_complete() && self.current_index + 1 == self.steps.len()
    }

    pub fn draft(&self) -> &IntakeDraft {
        self.store.get()
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn clear_messages(&mut self) {
        self.last_error = None;
        self.notice = None;
    }

    /// Run an edit against the store unless the session is complete.
    ///
    /// Returns whether the edit was applied.
    fn edit(&mut self, f: impl FnOnce(&mut FormDraftStore)) -> bool {
        if self.is_complete() {
            return false;
        }
        f(&mut self.store);
        self.clear_messages();
        true
    }

    pub fn update_field(&mut self, update: DraftUpdate) -> bool {
        self.edit(|store| store.set(update))
    }

    pub fn toggle_day(&mut self, day: Weekday) -> bool {
        self.edit(|store| store.toggle(day))
    }

    pub fn select_days(&mut self, preset: DaysPreset) -> bool {
        self.edit(|store| store.select_days(preset))
    }

    pub fn append_photos(&mut self, references: Vec<String>) -> bool {
        self.edit(|store| store.append_photos(references))
    }

    /// Move forward if the current step's predicate holds.
    ///
    /// On failure the session stays put and `ValidationFailed` is recorded.
    pub fn advance(&mut self) -> Result<WizardState, ErrorKind> {
        let Some(step) = self.current_step() else {
            return Ok(WizardState::Complete);
        };

        if !step.is_satisfied(self.store.get()) {
            self.last_error = Some(ErrorKind::ValidationFailed);
            return Err(ErrorKind::ValidationFailed);
        }

        self.current_index += 1;
        self.clear_messages();
        Ok(self.state())
    }

    /// Move back one step. No-op on the first step and once complete.
    pub fn retreat(&mut self) -> bool {
        if self.is_complete() || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.clear_messages();
        true
    }

    /// Check the session may be submitted and return the draft to hand off.
    ///
    /// Outside the final step this is rejected without touching any state.
    /// On the final step an unsatisfied predicate records `ValidationFailed`.
    pub fn prepare_submission(&mut self) -> Result<IntakeDraft, ErrorKind> {
        if !self.is_final_step() {
            return Err(ErrorKind::ValidationFailed);
        }
        let satisfied = self
            .current_step()
            .is_some_and(|step| step.is_satisfied(self.store.get()));
        if !satisfied {
            self.last_error = Some(ErrorKind::ValidationFailed);
            return Err(ErrorKind::ValidationFailed);
        }
        Ok(self.store.get().clone())
    }

    /// The sink accepted the draft
    pub fn complete_submission(&mut self, notice: impl Into<String>) {
        self.current_index = self.steps.len();
        self.last_error = None;
        self.notice = Some(notice.into());
    }

    /// The sink rejected the draft; stay on the final step with data intact
    pub fn fail_submission(&mut self) {
        self.notice = None;
        self.last_error = Some(ErrorKind::SubmissionFailed);
    }

    /// Write a captured location into the draft
    pub fn record_location(&mut self, result: &LocationResult) -> bool {
        let applied = self.edit(|store| store.record_location(result));
        if applied {
            self.notice = Some(result.notice().to_string());
        }
        applied
    }

    pub fn record_error(&mut self, kind: ErrorKind) {
        self.notice = None;
        self.last_error = Some(kind);
    }
}
