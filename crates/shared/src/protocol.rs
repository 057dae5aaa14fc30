use serde::{Deserialize, Serialize};

use crate::{
    domain::{ContactId, MarkerId, SessionPhase, StartPrompt},
    error::InputError,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawTouch {
    pub identifier: i64,
    pub x: f64,
    pub y: f64,
}

/// Raw platform input as delivered by a surface adapter. Coordinates are
/// already local to the game surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum InputEvent {
    TouchStart { touches: Vec<RawTouch> },
    TouchEnd { identifiers: Vec<i64> },
    TouchCancel { identifiers: Vec<i64> },
    PointerDown { x: f64, y: f64 },
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub id: ContactId,
    pub x: f64,
    pub y: f64,
}

impl ContactPoint {
    pub fn new(id: ContactId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl From<RawTouch> for ContactPoint {
    fn from(touch: RawTouch) -> Self {
        Self::new(ContactId::Touch(touch.identifier), touch.x, touch.y)
    }
}

/// The single normalized shape the core consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactBatch {
    Began(Vec<ContactPoint>),
    Ended(Vec<ContactId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub id: MarkerId,
    pub x: f64,
    pub y: f64,
    pub age_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub time_remaining_secs: u32,
    pub markers: Vec<MarkerView>,
    /// Label for the overlay button; absent while a session is playing.
    pub start_prompt: Option<StartPrompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted,
    Scored { added: u64, score: u64 },
    CountdownTicked { remaining: u32 },
    SessionEnded { final_score: u64 },
    MarkersExpired { count: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ScriptCommand {
    Start,
    Input(InputEvent),
}

/// One line of an offline script: a command stamped with its virtual time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub command: ScriptCommand,
}

/// Parses JSON-lines text. Blank lines and lines starting with `#` are skipped;
/// line numbers in errors are 1-based.
pub fn parse_script(raw: &str) -> Result<Vec<ScriptStep>, InputError> {
    parse_lines(raw)
}

pub fn parse_command_line(line: usize, raw: &str) -> Result<ScriptCommand, InputError> {
    serde_json::from_str(raw).map_err(|source| InputError::MalformedLine { line, source })
}

fn parse_lines<T: serde::de::DeserializeOwned>(raw: &str) -> Result<Vec<T>, InputError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| InputError::MalformedLine {
                line: idx + 1,
                source,
            })
        })
        .collect()
}
