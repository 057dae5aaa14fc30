use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::InputError;

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);
    };
}

id_newtype!(MarkerId, u64);

/// Key of a held contact. Touch identifiers are whatever the platform hands
/// out, negative ones included, so the single pointer gets its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactId {
    Touch(i64),
    Pointer,
}

/// Fixed session length in seconds.
pub const SESSION_DURATION_SECS: u32 = 30;

pub const COUNTDOWN_PERIOD: Duration = Duration::from_millis(1000);
pub const SWEEP_PERIOD: Duration = Duration::from_millis(100);
pub const MARKER_LIFETIME: Duration = Duration::from_millis(1000);

/// Milliseconds on the host's timeline. The origin is whatever the host
/// mounted at; only differences are meaningful.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn millis_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn saturating_add(self, period: Duration) -> Self {
        Self(self.0.saturating_add(duration_millis(period)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

pub fn duration_millis(period: Duration) -> u64 {
    u64::try_from(period.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Playing,
    Ended,
}

impl SessionPhase {
    /// `Start` before any session has run, `PlayAgain` once one has ended.
    pub fn start_prompt(self) -> Option<StartPrompt> {
        match self {
            Self::Idle => Some(StartPrompt::Start),
            Self::Playing => None,
            Self::Ended => Some(StartPrompt::PlayAgain),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPrompt {
    Start,
    PlayAgain,
}

/// How a single-pointer click maps onto contact lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerReleasePolicy {
    /// Every pointer press is released right away, so each click is a new contact.
    #[default]
    Implicit,
    /// The pointer stays held until an explicit pointer-up arrives.
    Explicit,
}

impl PointerReleasePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Implicit => "implicit",
            Self::Explicit => "explicit",
        }
    }
}

impl FromStr for PointerReleasePolicy {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("implicit") {
            Ok(Self::Implicit)
        } else if raw.eq_ignore_ascii_case("explicit") {
            Ok(Self::Explicit)
        } else {
            Err(InputError::UnknownReleasePolicy(raw.to_string()))
        }
    }
}
