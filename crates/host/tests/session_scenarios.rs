use host::simulate;
use shared::{
    domain::{PointerReleasePolicy, SessionPhase, StartPrompt, Timestamp, SESSION_DURATION_SECS},
    protocol::{parse_script, GameEvent, InputEvent, RawTouch, ScriptCommand, ScriptStep},
};

fn step(at_ms: u64, command: ScriptCommand) -> ScriptStep {
    ScriptStep { at_ms, command }
}

fn start(at_ms: u64) -> ScriptStep {
    step(at_ms, ScriptCommand::Start)
}

fn press(at_ms: u64, touches: &[(i64, f64, f64)]) -> ScriptStep {
    step(
        at_ms,
        ScriptCommand::Input(InputEvent::TouchStart {
            touches: touches
                .iter()
                .map(|&(identifier, x, y)| RawTouch { identifier, x, y })
                .collect(),
        }),
    )
}

fn release(at_ms: u64, identifiers: &[i64]) -> ScriptStep {
    step(
        at_ms,
        ScriptCommand::Input(InputEvent::TouchEnd {
            identifiers: identifiers.to_vec(),
        }),
    )
}

fn run(steps: &[ScriptStep], horizon_ms: u64) -> host::SimulationReport {
    simulate(
        steps,
        PointerReleasePolicy::Implicit,
        Some(Timestamp(horizon_ms)),
    )
}

#[test]
fn single_touch_scores_one_with_marker() {
    let report = run(&[start(0), press(0, &[(10, 10.0, 10.0)])], 0);
    assert_eq!(report.snapshot.score, 1);
    assert_eq!(report.snapshot.markers.len(), 1);
    let marker = report.snapshot.markers[0];
    assert_eq!((marker.x, marker.y), (10.0, 10.0));
}

#[test]
fn two_simultaneous_fingers_score_two() {
    let report = run(&[start(0), press(5, &[(0, 5.0, 5.0), (1, 6.0, 6.0)])], 5);
    assert_eq!(report.snapshot.score, 2);
    assert_eq!(report.snapshot.markers.len(), 2);
}

#[test]
fn repeated_press_without_release_scores_once() {
    let report = run(
        &[start(0), press(10, &[(0, 1.0, 1.0)]), press(20, &[(0, 1.0, 1.0)])],
        20,
    );
    assert_eq!(report.snapshot.score, 1);
}

#[test]
fn press_after_release_scores_again() {
    let report = run(
        &[
            start(0),
            press(10, &[(0, 1.0, 1.0)]),
            release(20, &[0]),
            press(30, &[(0, 1.0, 1.0)]),
        ],
        30,
    );
    assert_eq!(report.snapshot.score, 2);
}

#[test]
fn session_ends_after_thirty_ticks_and_ignores_later_presses() {
    let report = simulate(
        &[start(0), press(500, &[(0, 1.0, 1.0)]), press(31_000, &[(1, 2.0, 2.0)])],
        PointerReleasePolicy::Implicit,
        None,
    );

    assert_eq!(report.snapshot.phase, SessionPhase::Ended);
    assert_eq!(report.snapshot.score, 1);
    assert_eq!(report.snapshot.time_remaining_secs, 0);
    assert_eq!(report.snapshot.start_prompt, Some(StartPrompt::PlayAgain));

    let ended: Vec<_> = report
        .events_of(|event| matches!(event, GameEvent::SessionEnded { .. }))
        .collect();
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].at_ms, 30_000);
    assert_eq!(ended[0].event, GameEvent::SessionEnded { final_score: 1 });
    assert_eq!(
        report
            .events_of(|event| matches!(event, GameEvent::CountdownTicked { .. }))
            .count(),
        SESSION_DURATION_SECS as usize
    );
}

#[test]
fn simulation_without_horizon_runs_until_the_session_ends() {
    let report = simulate(&[start(250)], PointerReleasePolicy::Implicit, None);
    assert_eq!(report.snapshot.phase, SessionPhase::Ended);
    assert_eq!(report.finished_at_ms, 30_250);
}

#[test]
fn marker_lives_one_second_then_sweeps() {
    let steps = [start(0), press(0, &[(0, 3.0, 3.0)])];

    let before_expiry = run(&steps, 999);
    assert_eq!(before_expiry.snapshot.markers.len(), 1);
    assert_eq!(before_expiry.snapshot.markers[0].age_ms, 999);

    let after_sweep = run(&steps, 1_101);
    assert!(after_sweep.snapshot.markers.is_empty());
    assert!(after_sweep
        .events
        .iter()
        .any(|timed| timed.at_ms == 1_000 && timed.event == GameEvent::MarkersExpired { count: 1 }));
}

#[test]
fn restart_mid_session_starts_clean() {
    let report = run(
        &[
            start(0),
            press(100, &[(0, 1.0, 1.0), (1, 2.0, 2.0)]),
            start(2_500),
            press(2_600, &[(0, 1.0, 1.0)]),
        ],
        3_000,
    );

    assert_eq!(report.snapshot.phase, SessionPhase::Playing);
    assert_eq!(report.snapshot.score, 1);
    assert_eq!(report.snapshot.markers.len(), 1);
    // countdown re-armed at 2.5s, so nothing has ticked yet in the new session
    assert_eq!(report.snapshot.time_remaining_secs, SESSION_DURATION_SECS);
}

#[test]
fn steps_are_ordered_by_time_not_by_position() {
    let report = run(&[press(10, &[(0, 1.0, 1.0)]), start(0)], 10);
    assert_eq!(report.snapshot.score, 1);
}

#[test]
fn parsed_script_drives_a_click_session() {
    let script = r#"
{"at_ms":0,"command":{"type":"start"}}
{"at_ms":100,"command":{"type":"input","payload":{"type":"pointer_down","payload":{"x":1.0,"y":1.0}}}}
{"at_ms":200,"command":{"type":"input","payload":{"type":"pointer_up"}}}
{"at_ms":300,"command":{"type":"input","payload":{"type":"pointer_down","payload":{"x":2.0,"y":2.0}}}}
"#;
    let steps = parse_script(script).expect("script");

    let implicit = simulate(&steps, PointerReleasePolicy::Implicit, Some(Timestamp(400)));
    assert_eq!(implicit.snapshot.score, 2);

    let explicit = simulate(&steps, PointerReleasePolicy::Explicit, Some(Timestamp(400)));
    assert_eq!(explicit.snapshot.score, 2);

    let serialized = serde_json::to_value(&implicit).expect("report json");
    assert_eq!(serialized["snapshot"]["phase"], "playing");
    assert!(serialized["snapshot"]["start_prompt"].is_null());
    assert_eq!(serialized["events"][0]["event"]["type"], "session_started");
}
