//! Session clock.
//!
//! Two independent periodic signals: a countdown tick every
//! `COUNTDOWN_PERIOD` and a marker sweep every `SWEEP_PERIOD`. The clock owns
//! no game logic. `ClockHandle` drives them from tokio tasks in real time;
//! `OfflineClock` computes the same schedule over a virtual timeline.

mod offline;
mod realtime;

pub use offline::OfflineClock;
pub use realtime::ClockHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockSignal {
    /// `generation` changes every time the countdown is re-armed, so a tick
    /// emitted before a re-arm can be told apart from the new phase.
    CountdownTick { generation: u64 },
    Sweep,
}

#[cfg(test)]
#[path = "tests/offline_tests.rs"]
mod offline_tests;

#[cfg(test)]
#[path = "tests/realtime_tests.rs"]
mod realtime_tests;
