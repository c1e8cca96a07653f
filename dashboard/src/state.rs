use std::collections::HashSet;

use types::RecordId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub active_record_id: Option<RecordId>,
    /// A selection asked for before the list could confirm it, e.g. from the
    /// location or from a game run that just finished.
    pub pending_record_id: Option<RecordId>,
    pub last_known_record_ids: HashSet<RecordId>,
}

impl DashboardState {
    pub fn is_active(&self, id: &RecordId) -> bool {
        self.active_record_id.as_ref() == Some(id)
    }

    pub fn knows(&self, id: &RecordId) -> bool {
        self.last_known_record_ids.contains(id)
    }
}
