use std::time::Duration;

use shared::domain::{duration_millis, Timestamp, COUNTDOWN_PERIOD, SWEEP_PERIOD};

use crate::ClockSignal;

#[derive(Debug, Clone, Copy)]
struct Schedule {
    period_ms: u64,
    next_due: Timestamp,
}

impl Schedule {
    fn starting_at(origin: Timestamp, period: Duration) -> Self {
        let period_ms = duration_millis(period).max(1);
        Self {
            period_ms,
            next_due: Timestamp(origin.0.saturating_add(period_ms)),
        }
    }

    fn peek(&self, until: Timestamp) -> Option<Timestamp> {
        (self.next_due <= until).then_some(self.next_due)
    }

    fn advance(&mut self) {
        self.next_due = Timestamp(self.next_due.0.saturating_add(self.period_ms));
    }
}

/// The realtime schedule replayed over virtual milliseconds.
#[derive(Debug, Clone)]
pub struct OfflineClock {
    countdown: Schedule,
    sweep: Schedule,
    generation: u64,
    now: Timestamp,
}

impl OfflineClock {
    pub fn new(origin: Timestamp) -> Self {
        Self {
            countdown: Schedule::starting_at(origin, COUNTDOWN_PERIOD),
            sweep: Schedule::starting_at(origin, SWEEP_PERIOD),
            generation: 0,
            now: origin,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Every signal due in `(now, until]`, oldest first. On a tie the
    /// countdown tick comes before the sweep. Moving backwards yields nothing.
    pub fn advance_to(&mut self, until: Timestamp) -> Vec<(Timestamp, ClockSignal)> {
        let mut due = Vec::new();
        if until < self.now {
            return due;
        }

        loop {
            let countdown = self.countdown.peek(until);
            let sweep = self.sweep.peek(until);
            match (countdown, sweep) {
                (Some(c), Some(s)) if c <= s => {
                    due.push((c, self.countdown_signal()));
                    self.countdown.advance();
                }
                (Some(c), None) => {
                    due.push((c, self.countdown_signal()));
                    self.countdown.advance();
                }
                (_, Some(s)) => {
                    due.push((s, ClockSignal::Sweep));
                    self.sweep.advance();
                }
                (None, None) => break,
            }
        }

        self.now = until;
        due
    }

    pub fn rearm_countdown(&mut self, at: Timestamp) {
        self.generation += 1;
        self.countdown = Schedule::starting_at(at, COUNTDOWN_PERIOD);
    }

    fn countdown_signal(&self) -> ClockSignal {
        ClockSignal::CountdownTick {
            generation: self.generation,
        }
    }
}
