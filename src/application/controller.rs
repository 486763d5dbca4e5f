use crate::application::filter::FilterCriteria;
use crate::domain::error::FleetError;
use crate::domain::traits::{Filterable, Keyed};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Where a page is in its load cycle.
#[derive(Debug)]
pub enum LoadPhase {
    /// No fetch has completed yet.
    Loading,
    /// Cache holds the payload of the last installed reload.
    Ready,
    /// The last reload failed; the cache is whatever was installed before.
    Failed(FleetError),
}

/// Handle for one in-flight reload. Completing it with anything but the
/// latest issued sequence is a no-op on the cache.
#[derive(Debug)]
pub struct ReloadTicket {
    seq: u64,
}

impl ReloadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Handle for one in-flight mutation on a single record key.
#[derive(Debug)]
pub struct MutationTicket<K> {
    key: K,
}

impl<K: Clone> MutationTicket<K> {
    pub fn key(&self) -> K {
        self.key.clone()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Payload installed, view recomputed.
    Installed,
    /// Stale sequence or closed controller; nothing changed.
    Discarded,
    /// Fetch error recorded; cache untouched.
    Failed,
}

#[derive(Debug)]
pub enum MutateOutcome {
    /// Authoritative record merged into the cache.
    Merged,
    /// Server confirmed without a record; caller should refetch.
    Confirmed,
    /// Controller was closed before the response landed.
    Discarded,
    /// Mutation failed; cache unchanged, the error is for the UI.
    Failed(FleetError),
}

/// What the renderer sees. `Empty` means a fetch succeeded and the
/// collection itself has zero records; a non-empty cache whose filtered
/// view is empty still renders as `Ready` with no rows.
pub enum ViewSnapshot<'a, T> {
    Loading,
    Unavailable(&'a FleetError),
    Empty,
    Ready(Vec<&'a T>),
}

/// Owns the cache and view for one page and mediates every
/// fetch/mutate/render cycle.
///
/// The reload cycle is split at the suspension point: `begin_reload`
/// issues a monotonically increasing sequence number, the caller performs
/// the fetch, and `complete_reload` installs the payload only when the
/// ticket is still the latest issued. A response that lost the race is
/// discarded no matter when it arrives, so the cache can never be
/// overwritten by a reload that was superseded before it completed.
pub struct ViewStateController<T: Keyed> {
    cache: Vec<T>,
    phase: LoadPhase,
    criteria: FilterCriteria,
    active: Option<T::Key>,
    issued_seq: u64,
    pending: HashSet<T::Key>,
    closed: bool,
}

impl<T: Keyed + Filterable + Clone> ViewStateController<T> {
    pub fn new() -> Self {
        Self {
            cache: Vec::new(),
            phase: LoadPhase::Loading,
            criteria: FilterCriteria::default(),
            active: None,
            issued_seq: 0,
            pending: HashSet::new(),
            closed: false,
        }
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn cache(&self) -> &[T] {
        &self.cache
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Teardown. Everything still in flight is discarded when it lands.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ---- reload cycle ----

    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.issued_seq += 1;
        debug!(seq = self.issued_seq, "reload issued");
        ReloadTicket {
            seq: self.issued_seq,
        }
    }

    pub fn complete_reload(
        &mut self,
        ticket: ReloadTicket,
        result: Result<Vec<T>, FleetError>,
    ) -> ReloadOutcome {
        if self.closed {
            debug!(seq = ticket.seq, "reload discarded: controller closed");
            return ReloadOutcome::Discarded;
        }
        if ticket.seq != self.issued_seq {
            debug!(
                seq = ticket.seq,
                latest = self.issued_seq,
                "reload discarded: superseded"
            );
            return ReloadOutcome::Discarded;
        }

        match result {
            Ok(records) => {
                self.cache = dedupe_by_key(records);
                self.phase = LoadPhase::Ready;
                // A selection that no longer resolves is dropped rather
                // than left dangling.
                if let Some(key) = self.active.clone() {
                    if !self.cache.iter().any(|r| r.key() == key) {
                        self.active = None;
                    }
                }
                ReloadOutcome::Installed
            }
            Err(err) => {
                self.phase = LoadPhase::Failed(err);
                ReloadOutcome::Failed
            }
        }
    }

    // ---- projection ----

    /// Pure filtered projection of the cache. Same cache and criteria
    /// always yield the same ordered output.
    pub fn project<'a>(&'a self, criteria: &FilterCriteria) -> Vec<&'a T> {
        self.cache.iter().filter(|r| criteria.matches(*r)).collect()
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Current view: the cache projected through the stored criteria.
    pub fn view(&self) -> Vec<&T> {
        self.project(&self.criteria)
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_, T> {
        match &self.phase {
            LoadPhase::Loading => ViewSnapshot::Loading,
            LoadPhase::Failed(err) => ViewSnapshot::Unavailable(err),
            LoadPhase::Ready if self.cache.is_empty() => ViewSnapshot::Empty,
            LoadPhase::Ready => ViewSnapshot::Ready(self.view()),
        }
    }

    // ---- selection ----

    /// Mark one record active. A key absent from the current view (it may
    /// have been removed by a reload that completed in between) signals
    /// `NotFound` and leaves the previous selection in place.
    pub fn select(&mut self, key: T::Key) -> Result<(), FleetError> {
        if self.view().iter().any(|r| r.key() == key) {
            self.active = Some(key);
            Ok(())
        } else {
            Err(FleetError::NotFound(format!(
                "no record with key {:?} in the current view",
                key
            )))
        }
    }

    pub fn active_key(&self) -> Option<&T::Key> {
        self.active.as_ref()
    }

    pub fn active_record(&self) -> Option<&T> {
        let key = self.active.as_ref()?;
        self.cache.iter().find(|r| r.key() == *key)
    }

    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    // ---- mutation cycle ----

    /// Start a mutation on one record key. At most one may be in flight
    /// per key; a second request is rejected with `Conflict` so it can
    /// never race the first.
    pub fn begin_mutate(&mut self, key: T::Key) -> Result<MutationTicket<T::Key>, FleetError> {
        if self.closed {
            return Err(FleetError::Conflict(
                "controller is shutting down".to_string(),
            ));
        }
        if !self.pending.insert(key.clone()) {
            return Err(FleetError::Conflict(format!(
                "a mutation for {:?} is already in flight",
                key
            )));
        }
        Ok(MutationTicket { key })
    }

    pub fn has_pending(&self, key: &T::Key) -> bool {
        self.pending.contains(key)
    }

    pub fn complete_mutate(
        &mut self,
        ticket: MutationTicket<T::Key>,
        result: Result<Option<T>, FleetError>,
    ) -> MutateOutcome {
        self.pending.remove(&ticket.key);

        if self.closed {
            return MutateOutcome::Discarded;
        }

        match result {
            Ok(Some(record)) => {
                let key = record.key();
                match self.cache.iter_mut().find(|r| r.key() == key) {
                    Some(slot) => *slot = record,
                    None => self.cache.push(record),
                }
                MutateOutcome::Merged
            }
            Ok(None) => MutateOutcome::Confirmed,
            Err(err) => MutateOutcome::Failed(err),
        }
    }
}

impl<T: Keyed + Filterable + Clone> Default for ViewStateController<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Collections are unique by key; a payload that violates that keeps the
// first occurrence.
fn dedupe_by_key<T: Keyed>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.key()) {
            out.push(record);
        } else {
            warn!(key = ?record.key(), "duplicate key in payload, keeping first");
        }
    }
    out
}
