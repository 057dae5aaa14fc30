//! Hosting event loop for a tap session.
//!
//! A single tokio task owns the `SessionController` and serializes input
//! commands with the two clock signals, so every handler runs to completion
//! before the next is dispatched. State changes fan out as `GameEvent`s.

use clock::{ClockHandle, ClockSignal};
use shared::{
    domain::{duration_millis, PointerReleasePolicy, Timestamp},
    protocol::{GameEvent, InputEvent, ScriptCommand, SessionSnapshot},
};
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info};

pub mod driver;
pub mod simulate;
pub mod source;

pub use driver::SessionDriver;
pub use simulate::{simulate, SimulationReport, TimedEvent};
pub use source::{pump, InputSource, LineSource, ScriptedSource};

const CLOCK_SIGNAL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    pub pointer_release: PointerReleasePolicy,
    pub command_capacity: usize,
    pub event_capacity: usize,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            pointer_release: PointerReleasePolicy::Implicit,
            command_capacity: 64,
            event_capacity: 256,
        }
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("game host is no longer running")]
    Closed,
    #[error("game host dropped the snapshot reply")]
    ReplyDropped,
}

pub enum HostCommand {
    Start,
    Input(InputEvent),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

impl HostCommand {
    fn name(&self) -> &'static str {
        match self {
            HostCommand::Start => "start",
            HostCommand::Input(_) => "input",
            HostCommand::Snapshot(_) => "snapshot",
            HostCommand::Shutdown => "shutdown",
        }
    }
}

#[derive(Clone)]
pub struct HostHandle {
    commands: mpsc::Sender<HostCommand>,
    events: broadcast::Sender<GameEvent>,
}

impl HostHandle {
    pub async fn start(&self) -> Result<(), HostError> {
        self.send(HostCommand::Start).await
    }

    pub async fn send_input(&self, event: InputEvent) -> Result<(), HostError> {
        self.send(HostCommand::Input(event)).await
    }

    pub async fn submit(&self, command: ScriptCommand) -> Result<(), HostError> {
        match command {
            ScriptCommand::Start => self.start().await,
            ScriptCommand::Input(event) => self.send_input(event).await,
        }
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(HostCommand::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| HostError::ReplyDropped)
    }

    pub async fn shutdown(&self) -> Result<(), HostError> {
        self.send(HostCommand::Shutdown).await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    async fn send(&self, command: HostCommand) -> Result<(), HostError> {
        let name = command.name();
        self.commands
            .send(command)
            .await
            .map_err(|_| HostError::Closed)?;
        debug!(command = name, "queued host command");
        Ok(())
    }
}

/// Spawns the event loop. The clock is mounted inside the loop and released
/// on every exit: shutdown, all handles dropped, panic, or abort of the
/// returned task.
pub fn launch(settings: HostSettings) -> (HostHandle, JoinHandle<()>) {
    let (commands_tx, commands_rx) = mpsc::channel(settings.command_capacity.max(1));
    let (events, _) = broadcast::channel(settings.event_capacity.max(1));

    let host = GameHost {
        driver: SessionDriver::new(settings.pointer_release),
        events: events.clone(),
        epoch: Instant::now(),
    };
    let task = tokio::spawn(host.run(commands_rx));

    (
        HostHandle {
            commands: commands_tx,
            events,
        },
        task,
    )
}

struct GameHost {
    driver: SessionDriver,
    events: broadcast::Sender<GameEvent>,
    epoch: Instant,
}

impl GameHost {
    async fn run(mut self, mut commands: mpsc::Receiver<HostCommand>) {
        let (signals_tx, mut signals) = mpsc::channel(CLOCK_SIGNAL_CAPACITY);
        let mut clock = ClockHandle::mount(signals_tx);
        info!("host: running");

        loop {
            tokio::select! {
                biased;
                Some(signal) = signals.recv() => {
                    if clock.is_current(signal) {
                        self.on_signal(signal);
                    }
                }
                command = commands.recv() => match command {
                    None | Some(HostCommand::Shutdown) => break,
                    Some(HostCommand::Start) => self.on_start(&mut clock),
                    Some(HostCommand::Input(event)) => self.on_input(event),
                    Some(HostCommand::Snapshot(reply)) => {
                        let _ = reply.send(self.driver.snapshot(self.now()));
                    }
                },
            }
        }

        clock.stop();
        info!("host: stopped");
    }

    fn on_start(&mut self, clock: &mut ClockHandle) {
        clock.rearm_countdown();
        let events = self.driver.handle_command(ScriptCommand::Start, self.now());
        self.publish(events);
    }

    fn on_input(&mut self, event: InputEvent) {
        let events = self.driver.handle_input(event, self.now());
        self.publish(events);
    }

    fn on_signal(&mut self, signal: ClockSignal) {
        let events = self.driver.handle_signal(signal, self.now());
        self.publish(events);
    }

    fn publish(&self, events: Vec<GameEvent>) {
        for event in events {
            let _ = self.events.send(event);
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp(duration_millis(self.epoch.elapsed()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
