use clock::OfflineClock;
use serde::Serialize;
use shared::{
    domain::{PointerReleasePolicy, Timestamp, COUNTDOWN_PERIOD},
    protocol::{GameEvent, ScriptCommand, ScriptStep, SessionSnapshot},
};
use tracing::debug;

use crate::driver::SessionDriver;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: GameEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub finished_at_ms: u64,
    pub snapshot: SessionSnapshot,
    pub events: Vec<TimedEvent>,
}

impl SimulationReport {
    pub fn events_of(&self, matches: impl Fn(&GameEvent) -> bool) -> impl Iterator<Item = &TimedEvent> {
        self.events.iter().filter(move |timed| matches(&timed.event))
    }
}

/// Replays `steps` against a virtual clock starting at 0 ms.
///
/// Steps run in `at_ms` order, ties in script order. Clock signals due at or
/// before a step are applied first. After the last step the clock runs to
/// `horizon` if given, otherwise until a playing session ends.
pub fn simulate(
    steps: &[ScriptStep],
    policy: PointerReleasePolicy,
    horizon: Option<Timestamp>,
) -> SimulationReport {
    let mut ordered: Vec<&ScriptStep> = steps.iter().collect();
    ordered.sort_by_key(|step| step.at_ms);

    let mut run = Simulation {
        clock: OfflineClock::new(Timestamp(0)),
        driver: SessionDriver::new(policy),
        events: Vec::new(),
    };

    for step in ordered {
        let at = Timestamp(step.at_ms);
        run.advance_to(at);
        if step.command == ScriptCommand::Start {
            run.clock.rearm_countdown(at);
        }
        let events = run.driver.handle_command(step.command.clone(), at);
        run.record(at, events);
    }

    match horizon {
        Some(horizon) => run.advance_to(horizon),
        None => {
            while run.driver.is_playing() {
                let next = run.clock.now().saturating_add(COUNTDOWN_PERIOD);
                run.advance_to(next);
            }
        }
    }

    let finished_at = run.clock.now();
    debug!(%finished_at, events = run.events.len(), "simulation: finished");
    SimulationReport {
        finished_at_ms: finished_at.as_millis(),
        snapshot: run.driver.snapshot(finished_at),
        events: run.events,
    }
}

struct Simulation {
    clock: OfflineClock,
    driver: SessionDriver,
    events: Vec<TimedEvent>,
}

impl Simulation {
    fn advance_to(&mut self, until: Timestamp) {
        for (at, signal) in self.clock.advance_to(until) {
            let events = self.driver.handle_signal(signal, at);
            self.record(at, events);
        }
    }

    fn record(&mut self, at: Timestamp, events: Vec<GameEvent>) {
        self.events.extend(events.into_iter().map(|event| TimedEvent {
            at_ms: at.as_millis(),
            event,
        }));
    }
}
