//! Tap session core.
//!
//! Deduplicates contacts, accumulates score, tracks feedback markers and
//! drives the Idle -> Playing -> Ended lifecycle. Synchronous and free of
//! I/O: callers supply timestamps and deliver clock ticks, and every handler
//! runs to completion before the next one.

pub mod contacts;
pub mod input;
pub mod markers;
pub mod score;
pub mod session;
pub mod tracker;

pub use contacts::ActiveContactSet;
pub use input::InputAdapter;
pub use markers::{TapMarker, TapMarkerRegistry};
pub use score::ScoreAccumulator;
pub use session::{CountdownOutcome, SessionController, SessionState};
pub use tracker::TouchTracker;

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod session_tests;

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tracker_tests;

#[cfg(test)]
#[path = "tests/markers_tests.rs"]
mod markers_tests;

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod input_tests;
