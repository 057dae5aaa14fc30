//! Command and clock-signal handling shared by the realtime host and the
//! offline simulator.

use clock::ClockSignal;
use shared::{
    domain::{PointerReleasePolicy, Timestamp},
    protocol::{GameEvent, InputEvent, ScriptCommand, SessionSnapshot},
};
use tap_core::{CountdownOutcome, InputAdapter, SessionController};

pub struct SessionDriver {
    controller: SessionController,
    adapter: InputAdapter,
}

impl SessionDriver {
    pub fn new(policy: PointerReleasePolicy) -> Self {
        Self {
            controller: SessionController::new(),
            adapter: InputAdapter::new(policy),
        }
    }

    pub fn handle_command(&mut self, command: ScriptCommand, at: Timestamp) -> Vec<GameEvent> {
        match command {
            ScriptCommand::Start => {
                self.controller.start();
                vec![GameEvent::SessionStarted]
            }
            ScriptCommand::Input(event) => self.handle_input(event, at),
        }
    }

    pub fn handle_input(&mut self, event: InputEvent, at: Timestamp) -> Vec<GameEvent> {
        self.adapter
            .normalize(event)
            .iter()
            .filter_map(|batch| {
                let added = self.controller.apply(batch, at);
                (added > 0).then(|| GameEvent::Scored {
                    added,
                    score: self.controller.state().score(),
                })
            })
            .collect()
    }

    pub fn handle_signal(&mut self, signal: ClockSignal, at: Timestamp) -> Vec<GameEvent> {
        match signal {
            ClockSignal::CountdownTick { .. } => match self.controller.on_countdown_tick() {
                CountdownOutcome::Ignored => Vec::new(),
                CountdownOutcome::Ticked { remaining } => {
                    vec![GameEvent::CountdownTicked { remaining }]
                }
                CountdownOutcome::Ended { final_score } => vec![
                    GameEvent::CountdownTicked { remaining: 0 },
                    GameEvent::SessionEnded { final_score },
                ],
            },
            ClockSignal::Sweep => match self.controller.sweep(at) {
                0 => Vec::new(),
                count => vec![GameEvent::MarkersExpired { count }],
            },
        }
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_accepting_input()
    }

    pub fn snapshot(&self, now: Timestamp) -> SessionSnapshot {
        self.controller.snapshot(now)
    }
}
