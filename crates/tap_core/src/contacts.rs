use std::collections::HashSet;

use shared::domain::ContactId;

/// Identifiers currently held down. An id is present iff its press was seen
/// and no release or cancel for it has been seen since.
#[derive(Debug, Default, Clone)]
pub struct ActiveContactSet {
    held: HashSet<ContactId>,
}

impl ActiveContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the id was not already held.
    pub fn press(&mut self, id: ContactId) -> bool {
        self.held.insert(id)
    }

    pub fn release(&mut self, id: ContactId) -> bool {
        self.held.remove(&id)
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.held.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}
