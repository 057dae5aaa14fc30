use shared::{
    domain::{ContactId, Timestamp},
    protocol::ContactPoint,
};
use tracing::debug;

use crate::{contacts::ActiveContactSet, markers::TapMarkerRegistry, session::SessionState};

/// Turns press batches into the subset of genuinely new contacts and keeps
/// the held set in step with releases.
#[derive(Debug, Default)]
pub struct TouchTracker {
    active: ActiveContactSet,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores every contact in `batch` whose id is not already held, creating
    /// one marker per new contact. A held id, or an id repeated later in the
    /// same batch, contributes nothing. Does nothing unless `session` accepts
    /// input. Returns the number of points added.
    pub fn on_contacts_begin(
        &mut self,
        session: &mut SessionState,
        markers: &mut TapMarkerRegistry,
        batch: &[ContactPoint],
        at: Timestamp,
    ) -> u64 {
        if !session.is_accepting_input() {
            debug!(
                phase = ?session.phase(),
                contacts = batch.len(),
                "tracker: press batch ignored outside play"
            );
            return 0;
        }

        let fresh: Vec<ContactPoint> = batch
            .iter()
            .copied()
            .filter(|contact| self.active.press(contact.id))
            .collect();

        for contact in &fresh {
            markers.register(contact.x, contact.y, at);
        }

        let added = fresh.len() as u64;
        session.record_new_contacts(added);
        debug!(
            received = batch.len(),
            added,
            held = self.active.len(),
            "tracker: press batch"
        );
        added
    }

    /// Releases each id. Unknown ids are ignored.
    pub fn on_contacts_end(&mut self, ids: &[ContactId]) {
        for id in ids {
            self.active.release(*id);
        }
    }

    pub fn active(&self) -> &ActiveContactSet {
        &self.active
    }

    pub fn reset(&mut self) {
        self.active.clear();
    }
}
