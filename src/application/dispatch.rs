use crate::domain::error::FleetError;
use dashmap::DashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Submitting,
}

#[derive(Debug)]
struct Entry {
    state: ActionState,
    draft: Option<String>,
}

/// Translates a user intent into exactly one mutation request per target.
///
/// Per-target state machine: `Idle -> Submitting -> {succeed, fail}`.
/// `succeed` returns to `Idle` once the cache has been reconciled and
/// drops the draft; `fail` returns to `Idle` immediately but keeps the
/// draft so the user can resend without retyping.
pub struct ActionDispatcher<K: Eq + Hash> {
    entries: DashMap<K, Entry>,
}

impl<K: Eq + Hash + Clone> ActionDispatcher<K> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Claim the target for one submission. A target already submitting
    /// is rejected with `Conflict`, which is what disables the trigger
    /// until the prior request resolves.
    pub fn begin(&self, key: K, draft: impl Into<String>) -> Result<(), FleetError> {
        let mut entry = self.entries.entry(key).or_insert(Entry {
            state: ActionState::Idle,
            draft: None,
        });
        if entry.state == ActionState::Submitting {
            return Err(FleetError::Conflict(
                "an action for this target is already submitting".to_string(),
            ));
        }
        entry.state = ActionState::Submitting;
        entry.draft = Some(draft.into());
        Ok(())
    }

    /// The request succeeded and the cache was reconciled.
    pub fn succeed(&self, key: &K) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.state = ActionState::Idle;
            entry.draft = None;
        }
    }

    /// The request failed. Returns the preserved draft; it also stays
    /// readable through `draft` until the next submission.
    pub fn fail(&self, key: &K) -> Option<String> {
        let mut entry = self.entries.get_mut(key)?;
        entry.state = ActionState::Idle;
        entry.draft.clone()
    }

    pub fn state(&self, key: &K) -> ActionState {
        self.entries
            .get(key)
            .map(|e| e.state)
            .unwrap_or(ActionState::Idle)
    }

    pub fn is_submitting(&self, key: &K) -> bool {
        self.state(key) == ActionState::Submitting
    }

    pub fn draft(&self, key: &K) -> Option<String> {
        self.entries.get(key).and_then(|e| e.draft.clone())
    }
}

impl<K: Eq + Hash + Clone> Default for ActionDispatcher<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject empty required input before anything reaches the network.
pub fn validate_draft(input: &str, what: &str) -> Result<String, FleetError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FleetError::Validation(format!("please enter a {}", what)));
    }
    Ok(trimmed.to_string())
}
