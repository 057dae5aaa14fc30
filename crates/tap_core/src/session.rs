use shared::{
    domain::{ContactId, SessionPhase, Timestamp, SESSION_DURATION_SECS},
    protocol::{ContactBatch, ContactPoint, SessionSnapshot},
};
use tracing::{debug, info};

use crate::{
    contacts::ActiveContactSet, markers::TapMarkerRegistry, score::ScoreAccumulator,
    tracker::TouchTracker,
};

/// The session value object: phase, score and countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    phase: SessionPhase,
    score: ScoreAccumulator,
    time_remaining_secs: u32,
}

impl SessionState {
    pub fn idle() -> Self {
        Self {
            phase: SessionPhase::Idle,
            score: ScoreAccumulator::new(),
            time_remaining_secs: SESSION_DURATION_SECS,
        }
    }

    fn playing() -> Self {
        Self {
            phase: SessionPhase::Playing,
            ..Self::idle()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score.value()
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    pub fn is_accepting_input(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub(crate) fn record_new_contacts(&mut self, n: u64) {
        debug_assert!(self.is_accepting_input());
        self.score.add(n);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// No session was playing.
    Ignored,
    Ticked { remaining: u32 },
    Ended { final_score: u64 },
}

/// Owns the session and its collaborators. All mutation goes through here.
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
    tracker: TouchTracker,
    markers: TapMarkerRegistry,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a fresh session from any phase, discarding held contacts and
    /// markers from the previous one.
    pub fn start(&mut self) {
        let previous = self.state.phase();
        self.state = SessionState::playing();
        self.tracker.reset();
        self.markers.clear();
        info!(
            ?previous,
            duration_secs = SESSION_DURATION_SECS,
            "session: started"
        );
    }

    pub fn on_countdown_tick(&mut self) -> CountdownOutcome {
        if !self.state.is_accepting_input() {
            return CountdownOutcome::Ignored;
        }

        self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
        let remaining = self.state.time_remaining_secs;
        if remaining == 0 {
            self.state.phase = SessionPhase::Ended;
            let final_score = self.state.score();
            info!(final_score, "session: ended");
            return CountdownOutcome::Ended { final_score };
        }

        debug!(remaining, "session: countdown");
        CountdownOutcome::Ticked { remaining }
    }

    pub fn is_accepting_input(&self) -> bool {
        self.state.is_accepting_input()
    }

    pub fn on_contacts_begin(&mut self, batch: &[ContactPoint], at: Timestamp) -> u64 {
        self.tracker
            .on_contacts_begin(&mut self.state, &mut self.markers, batch, at)
    }

    pub fn on_contacts_end(&mut self, ids: &[ContactId]) {
        self.tracker.on_contacts_end(ids);
    }

    /// Dispatches a normalized batch. Returns the points it added.
    pub fn apply(&mut self, batch: &ContactBatch, at: Timestamp) -> u64 {
        match batch {
            ContactBatch::Began(contacts) => self.on_contacts_begin(contacts, at),
            ContactBatch::Ended(ids) => {
                self.on_contacts_end(ids);
                0
            }
        }
    }

    /// Maintenance pass; runs regardless of phase.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        self.markers.sweep(now)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn markers(&self) -> &TapMarkerRegistry {
        &self.markers
    }

    pub fn active_contacts(&self) -> &ActiveContactSet {
        self.tracker.active()
    }

    pub fn snapshot(&self, now: Timestamp) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.state.phase(),
            score: self.state.score(),
            time_remaining_secs: self.state.time_remaining_secs(),
            markers: self.markers.views(now),
            start_prompt: self.state.phase().start_prompt(),
        }
    }
}
