use super::*;
use shared::domain::SessionPhase;

#[test]
fn play_defaults() {
    let cli = Cli::try_parse_from(["tapper", "play"]).unwrap();

    assert_eq!(cli.config, PathBuf::from(config::DEFAULT_CONFIG_PATH));
    assert!(matches!(cli.command, Command::Play { auto_start: false }));
}

#[test]
fn simulate_takes_script_and_horizon() {
    let cli = Cli::try_parse_from([
        "tapper",
        "--config",
        "custom.toml",
        "simulate",
        "--script",
        "run.jsonl",
        "--horizon-ms",
        "5000",
    ])
    .unwrap();

    assert_eq!(cli.config, PathBuf::from("custom.toml"));
    match cli.command {
        Command::Simulate { script, horizon_ms } => {
            assert_eq!(script, PathBuf::from("run.jsonl"));
            assert_eq!(horizon_ms, Some(5000));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn simulate_requires_script() {
    assert!(Cli::try_parse_from(["tapper", "simulate"]).is_err());
}

#[tokio::test(start_paused = true)]
async fn play_returns_when_the_session_ends_while_input_is_still_open() {
    let (_writer, reader) = tokio::io::duplex(64);
    let source = LineSource::new(BufReader::new(reader));

    let snapshot = tokio::time::timeout(
        std::time::Duration::from_secs(60),
        play(&Settings::default(), true, source),
    )
    .await
    .expect("play finishes with the session")
    .expect("play");

    assert_eq!(snapshot.phase, SessionPhase::Ended);
    assert_eq!(snapshot.time_remaining_secs, 0);
}

#[tokio::test(start_paused = true)]
async fn play_returns_when_input_closes_first() {
    let script = concat!(
        "{\"type\":\"start\"}\n",
        "{\"type\":\"input\",\"payload\":{\"type\":\"pointer_down\",\"payload\":{\"x\":1.0,\"y\":1.0}}}\n",
    );
    let source = LineSource::new(script.as_bytes());

    let snapshot = play(&Settings::default(), false, source)
        .await
        .expect("play");

    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.score, 1);
}
