//! Session persistence: every change is saved and a reopened session resumes.

use yutnori::{
    CenterExit, EventRecorder, GameSession, GameStatus, JsonFileStore, MemoryStore, NodeId,
    PieceId, RosterConfig, Rules, SnapshotStore, TeamId, Throw,
};

#[test]
fn test_file_session_resumes_mid_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("yutnori_state.json");

    {
        let mut session = GameSession::open(JsonFileStore::new(&path)).unwrap();
        session.start_roster(&RosterConfig::default()).unwrap();
        session.set_first_turn(&TeamId::new("blue")).unwrap();
        session
            .move_by(&PieceId::new("blue-0"), Throw::Mo.steps(), CenterExit::default())
            .unwrap();
        session.advance_turn().unwrap();
    }

    let session = GameSession::open(JsonFileStore::new(&path)).unwrap();
    let state = session.state().unwrap();
    assert_eq!(state.status(), GameStatus::Playing);
    assert_eq!(state.current_turn(), Some(&TeamId::new("red")));
    assert_eq!(
        state.piece(&PieceId::new("blue-0")).unwrap().node(),
        Some(NodeId::FIRST_CORNER)
    );
    assert!(state.start_time().is_some());
}

#[test]
fn test_snapshot_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");

    let mut session = GameSession::open(JsonFileStore::new(&path)).unwrap();
    session.start_roster(&RosterConfig::presets(3, 2)).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["status"], "choosing_first_turn");
    assert_eq!(value["teams"].as_array().unwrap().len(), 3);
    assert_eq!(value["pieces"].as_array().unwrap().len(), 6);
    assert_eq!(value["pieces"][0]["node"], serde_json::Value::Null);
    assert_eq!(value["current_turn"], serde_json::Value::Null);
    assert_eq!(value["winner"], serde_json::Value::Null);
}

#[test]
fn test_center_choice_is_honored() {
    let mut session = GameSession::open(MemoryStore::new()).unwrap();
    session.start_roster(&RosterConfig::default()).unwrap();
    session.set_first_turn(&TeamId::new("blue")).unwrap();
    session.move_piece(&PieceId::new("blue-0"), Some(NodeId::CENTER), false).unwrap();

    let path = session
        .move_by(&PieceId::new("blue-0"), 2, CenterExit::TowardThirdCorner)
        .unwrap();
    assert_eq!(path.destination(), Some("n28".parse().unwrap()));
}

#[test]
fn test_bonus_throw_rule_from_roster() {
    let roster = RosterConfig::default().with_rules(Rules { bonus_throw: true });
    let mut session = GameSession::open(MemoryStore::new())
        .unwrap()
        .with_observer(Box::new(EventRecorder::new()));
    session.start_roster(&roster).unwrap();
    session.set_first_turn(&TeamId::new("blue")).unwrap();

    session.move_piece(&PieceId::new("blue-0"), None, true).unwrap();
    let state = session.advance_turn().unwrap();
    assert_eq!(state.current_turn(), Some(&TeamId::new("blue")));

    let state = session.advance_turn().unwrap();
    assert_eq!(state.current_turn(), Some(&TeamId::new("red")));
}

#[test]
fn test_restart_and_reset() {
    let mut session = GameSession::open(MemoryStore::new()).unwrap();
    session.start_roster(&RosterConfig::default()).unwrap();
    session.set_first_turn(&TeamId::new("red")).unwrap();

    let state = session.restart().unwrap();
    assert_eq!(state.status(), GameStatus::ChoosingFirstTurn);
    assert_eq!(state.teams().len(), 2);

    session.reset().unwrap();
    assert!(session.state().is_none());
    assert_eq!(session.store().load().unwrap(), None);
}
