use super::*;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn sweeps_run_ten_times_per_countdown_tick() {
    let (tx, mut rx) = mpsc::channel(64);
    let _clock = ClockHandle::mount(tx);

    let mut sweeps = 0;
    let mut countdowns = 0;
    while countdowns < 2 {
        match rx.recv().await.expect("signal") {
            ClockSignal::Sweep => sweeps += 1,
            ClockSignal::CountdownTick { generation } => {
                assert_eq!(generation, 0);
                countdowns += 1;
            }
        }
    }

    // the sweep due at 2s may land before or after the second countdown tick
    assert!((19..=20).contains(&sweeps), "sweeps={sweeps}");
}

#[tokio::test(start_paused = true)]
async fn no_countdown_tick_fires_immediately_on_mount() {
    let (tx, mut rx) = mpsc::channel(64);
    let _clock = ClockHandle::mount(tx);

    tokio::time::sleep(Duration::from_millis(950)).await;
    let mut pending = Vec::new();
    while let Ok(signal) = rx.try_recv() {
        pending.push(signal);
    }
    assert_eq!(pending.len(), 9);
    assert!(pending.iter().all(|signal| *signal == ClockSignal::Sweep));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_releases_both_tasks() {
    let (tx, mut rx) = mpsc::channel(64);
    let clock = ClockHandle::mount(tx);
    drop(clock);

    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        while rx.recv().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok(), "signal channel should close once both tasks are gone");
}

#[tokio::test(start_paused = true)]
async fn rearm_marks_earlier_ticks_stale() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut clock = ClockHandle::mount(tx);

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let stale = ClockSignal::CountdownTick { generation: 0 };
    assert!(clock.is_current(stale));

    clock.rearm_countdown();
    assert!(!clock.is_current(stale));
    assert!(clock.is_current(ClockSignal::Sweep));

    while let Ok(_signal) = rx.try_recv() {}
    loop {
        if let ClockSignal::CountdownTick { generation } = rx.recv().await.expect("signal") {
            assert_eq!(generation, 1);
            break;
        }
    }
    clock.stop();
}
