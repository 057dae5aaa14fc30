use shared::{
    domain::{duration_millis, MarkerId, Timestamp, MARKER_LIFETIME},
    protocol::MarkerView,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapMarker {
    pub id: MarkerId,
    pub x: f64,
    pub y: f64,
    pub created_at: Timestamp,
}

impl TapMarker {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.millis_since(self.created_at) >= duration_millis(MARKER_LIFETIME)
    }

    pub fn view(&self, now: Timestamp) -> MarkerView {
        MarkerView {
            id: self.id,
            x: self.x,
            y: self.y,
            age_ms: now.millis_since(self.created_at),
        }
    }
}

/// Ephemeral feedback markers, one per scored contact, kept in insertion order.
///
/// Ids come from a counter that survives `clear`, so a renderer keyed on
/// `MarkerId` never sees the same key twice in one process.
#[derive(Debug, Default)]
pub struct TapMarkerRegistry {
    markers: Vec<TapMarker>,
    next_id: u64,
}

impl TapMarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, x: f64, y: f64, at: Timestamp) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.push(TapMarker {
            id,
            x,
            y,
            created_at: at,
        });
        id
    }

    /// Drops every marker at least `MARKER_LIFETIME` old. Returns how many went.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let before = self.markers.len();
        self.markers.retain(|marker| !marker.is_expired(now));
        let removed = before - self.markers.len();
        if removed > 0 {
            debug!(removed, live = self.markers.len(), %now, "markers: swept");
        }
        removed
    }

    pub fn live(&self) -> &[TapMarker] {
        &self.markers
    }

    pub fn views(&self, now: Timestamp) -> Vec<MarkerView> {
        self.markers.iter().map(|marker| marker.view(now)).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
