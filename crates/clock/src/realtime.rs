use std::time::Duration;

use shared::domain::{COUNTDOWN_PERIOD, SWEEP_PERIOD};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::ClockSignal;

/// Both periodic tasks, acquired together on `mount` and released together
/// on `stop` or drop. Once released, the tasks drop their senders.
pub struct ClockHandle {
    signals: mpsc::Sender<ClockSignal>,
    countdown_task: JoinHandle<()>,
    sweep_task: JoinHandle<()>,
    generation: u64,
}

impl ClockHandle {
    /// Must be called from within a tokio runtime.
    pub fn mount(signals: mpsc::Sender<ClockSignal>) -> Self {
        let generation = 0;
        let countdown_task = spawn_periodic(
            signals.clone(),
            ClockSignal::CountdownTick { generation },
            COUNTDOWN_PERIOD,
        );
        let sweep_task = spawn_periodic(signals.clone(), ClockSignal::Sweep, SWEEP_PERIOD);
        debug!("clock: mounted");

        Self {
            signals,
            countdown_task,
            sweep_task,
            generation,
        }
    }

    /// Restarts the countdown so its next tick lands one full period from now.
    pub fn rearm_countdown(&mut self) {
        self.countdown_task.abort();
        self.generation += 1;
        self.countdown_task = spawn_periodic(
            self.signals.clone(),
            ClockSignal::CountdownTick {
                generation: self.generation,
            },
            COUNTDOWN_PERIOD,
        );
        debug!(generation = self.generation, "clock: countdown re-armed");
    }

    /// False for countdown ticks from before the latest re-arm.
    pub fn is_current(&self, signal: ClockSignal) -> bool {
        match signal {
            ClockSignal::CountdownTick { generation } => generation == self.generation,
            ClockSignal::Sweep => true,
        }
    }

    pub fn stop(self) {}
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.countdown_task.abort();
        self.sweep_task.abort();
        debug!("clock: released");
    }
}

fn spawn_periodic(
    signals: mpsc::Sender<ClockSignal>,
    signal: ClockSignal,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if signals.send(signal).await.is_err() {
                break;
            }
        }
    })
}
