use std::fs;
use std::path::Path;

use delve_content::{Catalog, ContentFactory};
use delve_core::{CatalogOracle, FloorOracle, GameConfig, Position, SpawnKind};

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn minimal_data(dir: &Path) {
    write(dir, "config.toml", "fov_radius = 6\n");
    write(
        dir,
        "items.ron",
        r#"(items: {
            "dagger": (name: "Dagger", glyph: '/', color: (0, 191, 255), kind: Equippable(Weapon(power_bonus: 2))),
            "potion": (name: "Health Potion", glyph: '!', color: (127, 0, 255), kind: Consumable(Healing(amount: 5))),
        })"#,
    );
    write(
        dir,
        "actors.ron",
        r#"[
            ("player", (name: "Player", glyph: '@', color: (255, 255, 255), inventory_capacity: 26), [(key: "dagger", equipped: true)]),
            ("rat", (name: "Rat", glyph: 'r', color: (120, 90, 60), ai: Some(MeleeChaser)), []),
        ]"#,
    );
    write(dir, "dungeon.ron", r#"(floors: ["one", "two"])"#);
    write(
        dir,
        "floors/one.ron",
        r######"(name: "One", rows: ["#####", "#@r<#", "#####"], legend: {'r': Actor("rat")})"######,
    );
    write(
        dir,
        "floors/two.ron",
        r######"(name: "Two", rows: ["#####", "#>.!#", "#####"], legend: {'!': Item("potion")})"######,
    );
}

#[test]
fn loads_a_complete_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    minimal_data(dir.path());
    let factory = ContentFactory::new(dir.path());

    let config = factory.load_config().unwrap();
    assert_eq!(config.fov_radius, 6);
    assert_eq!(config.hit_chance_base, GameConfig::DEFAULT_HIT_CHANCE_BASE);

    let catalog = factory.load_catalog().unwrap();
    assert_eq!(catalog.depth_count(), 2);
    assert_eq!(catalog.player().unwrap().starting_items.len(), 1);
    assert!(catalog.actor("rat").is_some());
    assert!(catalog.item("potion").is_some());

    let first = catalog.floor(1).unwrap();
    assert_eq!(first.player_start, Some(Position::new(1, 1)));
    assert_eq!(first.upstairs, Some(Position::new(3, 1)));
    assert_eq!(first.spawns[0].kind, SpawnKind::Actor("rat".into()));
    assert_eq!(catalog.floor(2).unwrap().downstairs, Some(Position::new(1, 1)));
}

#[test]
fn inconsistent_spawn_keys_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    minimal_data(dir.path());
    write(
        dir.path(),
        "floors/two.ron",
        r######"(name: "Two", rows: ["#>d#"], legend: {'d': Actor("dragon")})"######,
    );

    let error = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(error.to_string().contains("dragon"));
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let error = ContentFactory::new(dir.path()).load_items().unwrap_err();
    assert!(error.to_string().contains("items.ron"));
}

#[test]
fn bundled_content_is_consistent() {
    let factory = ContentFactory::bundled();
    factory.load_config().unwrap();
    let catalog: Catalog = factory.load_catalog().unwrap();

    assert_eq!(catalog.depth_count(), 3);
    let player = catalog.player().unwrap();
    assert!(player.ai.is_none());
    assert!(player.starting_items.iter().any(|item| item.equipped));
    for depth in 1..=3 {
        let floor = catalog.floor(depth).unwrap();
        assert!(floor.upstairs.is_some() || floor.downstairs.is_some());
    }
    assert!(catalog.floor(1).unwrap().player_start.is_some());
}
