//! Decides which single record is active after the record list changes or
//! the user picks a card.

use itertools::Itertools;
use types::{RecordId, RecordSummary};

use crate::state::DashboardState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub preferred: Option<RecordId>,
    pub force: bool,
}

impl SelectionRequest {
    pub fn refresh(preferred: Option<RecordId>, force: bool) -> Self {
        Self { preferred, force }
    }

    pub fn explicit(id: RecordId) -> Self {
        Self {
            preferred: Some(id),
            force: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Empty,
    Unchanged(RecordId),
    Activated(RecordId),
}

impl Selection {
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            Selection::Empty => None,
            Selection::Unchanged(id) | Selection::Activated(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub selection: Selection,
    /// The preferred id, when it is not in this list. Report it once.
    pub missing_preferred: Option<RecordId>,
}

/// Candidate ids in priority order with duplicates dropped: preferred,
/// pending, active, then the first record.
pub fn candidates(
    state: &DashboardState,
    records: &[RecordSummary],
    preferred: Option<&RecordId>,
) -> Vec<RecordId> {
    [
        preferred,
        state.pending_record_id.as_ref(),
        state.active_record_id.as_ref(),
        records.first().map(|record| &record.id),
    ]
    .into_iter()
    .flatten()
    .unique()
    .cloned()
    .collect()
}

pub fn reconcile(
    state: &mut DashboardState,
    records: &[RecordSummary],
    request: SelectionRequest,
) -> Reconciliation {
    let ordered = candidates(state, records, request.preferred.as_ref());

    state.last_known_record_ids = records.iter().map(|record| record.id.clone()).collect();
    let missing_preferred = request.preferred.filter(|id| !state.knows(id));
    // Checked against a fresh list, the pending intent is now either
    // satisfied or known to be absent.
    state.pending_record_id = None;

    let Some(first) = records.first() else {
        state.active_record_id = None;
        return Reconciliation {
            selection: Selection::Empty,
            missing_preferred,
        };
    };

    let (chosen, force) = match ordered.into_iter().find(|id| state.knows(id)) {
        Some(id) => (id, request.force),
        None => (first.id.clone(), true),
    };

    let selection = if state.is_active(&chosen) && !force {
        Selection::Unchanged(chosen)
    } else {
        log::debug!("Activating record {chosen}");
        state.active_record_id = Some(chosen.clone());
        Selection::Activated(chosen)
    };

    Reconciliation {
        selection,
        missing_preferred,
    }
}
