//! Where host commands come from.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::protocol::{parse_command_line, ScriptCommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::{wrappers::LinesStream, StreamExt};

use crate::HostHandle;

#[async_trait]
pub trait InputSource: Send {
    /// `Ok(None)` once the source is exhausted.
    async fn next_command(&mut self) -> Result<Option<ScriptCommand>>;
}

/// Commands known up front.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    commands: VecDeque<ScriptCommand>,
}

impl From<Vec<ScriptCommand>> for ScriptedSource {
    fn from(commands: Vec<ScriptCommand>) -> Self {
        Self {
            commands: commands.into(),
        }
    }
}

#[async_trait]
impl InputSource for ScriptedSource {
    async fn next_command(&mut self) -> Result<Option<ScriptCommand>> {
        Ok(self.commands.pop_front())
    }
}

/// One JSON `ScriptCommand` per line. Blank lines and `#` comments are skipped.
pub struct LineSource<R> {
    lines: LinesStream<R>,
    line: usize,
}

impl<R: AsyncBufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LinesStream::new(reader.lines()),
            line: 0,
        }
    }
}

#[async_trait]
impl<R> InputSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_command(&mut self) -> Result<Option<ScriptCommand>> {
        while let Some(raw) = self.lines.next().await {
            self.line += 1;
            let raw = raw.with_context(|| format!("failed to read input line {}", self.line))?;
            let raw = raw.trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }
            return Ok(Some(parse_command_line(self.line, raw)?));
        }
        Ok(None)
    }
}

/// Forwards commands until the source runs dry. Returns how many were sent.
pub async fn pump<S>(source: &mut S, handle: &HostHandle) -> Result<usize>
where
    S: InputSource + ?Sized,
{
    let mut forwarded = 0;
    while let Some(command) = source.next_command().await? {
        handle
            .submit(command)
            .await
            .context("host stopped while forwarding input")?;
        forwarded += 1;
    }
    Ok(forwarded)
}
