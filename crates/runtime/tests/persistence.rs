use delve_content::ContentFactory;
use delve_runtime::{
    Engine, EngineError, FileSaveRepository, InMemorySaveRepository, MessageLog, RepositoryError,
    SaveGame, SaveRepository, WaitDecisions,
};

fn bundled_engine(seed: u64) -> Engine<MessageLog> {
    let factory = ContentFactory::bundled();
    let config = factory.load_config().unwrap();
    let catalog = factory.load_catalog().unwrap();
    Engine::builder(MessageLog::new(config.message_capacity))
        .config(config)
        .catalog(catalog)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn bundled_dungeon_runs_without_errors() {
    let mut engine = bundled_engine(2024);
    let mut rounds = 0;
    while rounds < 40 && !engine.is_game_over() {
        engine.run_round(&mut WaitDecisions).unwrap();
        rounds += 1;
    }
    assert_eq!(engine.state().turn.round, rounds);
    assert!(engine.state().turn.nonce > 0);
    assert!(engine.state().floor().living_actors().all(|a| a.fighter.energy >= 0));
}

#[test]
fn same_seed_same_game() {
    let mut first = bundled_engine(7);
    let mut second = bundled_engine(7);
    for _ in 0..15 {
        first.run_round(&mut WaitDecisions).unwrap();
        second.run_round(&mut WaitDecisions).unwrap();
    }
    assert_eq!(first.state(), second.state());
    assert_eq!(first.snapshot().unwrap(), second.snapshot().unwrap());
}

#[test]
fn file_saves_restore_the_game() {
    let dir = tempfile::tempdir().unwrap();
    let repository = FileSaveRepository::new(dir.path()).unwrap();

    let mut engine = bundled_engine(99);
    engine.run_round(&mut WaitDecisions).unwrap();
    engine.run_round(&mut WaitDecisions).unwrap();
    engine.save(&repository, "slot1").unwrap();
    let saved = engine.state().clone();

    engine.run_round(&mut WaitDecisions).unwrap();
    assert_ne!(engine.state().turn.round, saved.turn.round);

    assert!(engine.load(&repository, "slot1").unwrap());
    assert_eq!(engine.state(), &saved);
    assert_eq!(repository.list_slots().unwrap(), vec!["slot1"]);
}

#[test]
fn loading_an_empty_slot_changes_nothing() {
    let repository = InMemorySaveRepository::new();
    let mut engine = bundled_engine(3);
    engine.run_round(&mut WaitDecisions).unwrap();
    let before = engine.state().clone();

    assert!(!engine.load(&repository, "missing").unwrap());
    assert_eq!(engine.state(), &before);
}

#[test]
fn outdated_saves_are_refused() {
    let repository = InMemorySaveRepository::new();
    let mut engine = bundled_engine(4);
    let mut save = SaveGame::capture(engine.state());
    save.format_version += 1;
    repository.save("old", &save).unwrap();

    let error = engine.load(&repository, "old").unwrap_err();
    assert!(matches!(
        error,
        EngineError::Repository(RepositoryError::IncompatibleVersion { .. })
    ));
}

#[test]
fn snapshots_rebuild_an_equivalent_engine() {
    let mut engine = bundled_engine(11);
    for _ in 0..5 {
        engine.run_round(&mut WaitDecisions).unwrap();
    }
    let bytes = engine.snapshot().unwrap();
    let factory = ContentFactory::bundled();
    let mut restored = Engine::from_snapshot(
        &bytes,
        factory.load_catalog().unwrap(),
        factory.load_config().unwrap(),
        MessageLog::default(),
    )
    .unwrap();

    engine.run_round(&mut WaitDecisions).unwrap();
    restored.run_round(&mut WaitDecisions).unwrap();
    assert_eq!(engine.state(), restored.state());
}
