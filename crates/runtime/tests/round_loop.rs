use delve_content::Catalog;
use delve_core::{
    ActionKind, ActorState, ActorTemplate, AiKind, AttackOutcome, BumpAction, ColorTag,
    Controller, Direction, EntityId, FloorBlueprint, FloorState, GameConfig, GameEvent, GameState,
    LevelUpAction, LevelUpChoice, MeleeAction, Position, StatusEffect, StatusKind,
    TakeStairsAction, TileFlags, effects, lifecycle,
};
use delve_runtime::{
    Activation, DecisionSource, Engine, MessageLog, ScriptedDecisions, WaitDecisions,
};

fn place_player(state: &mut GameState, template: &ActorTemplate, position: Position) {
    let hero =
        ActorState::from_template(EntityId::PLAYER, template, position, || state.allocate_entity_id());
    state.floor_mut().actors.insert(EntityId::PLAYER, hero);
}

fn hero() -> ActorTemplate {
    ActorTemplate::builder("Player")
        .player(26)
        .stats(30, 5, 0)
        .accuracy(100)
        .build()
}

fn engine_for(state: GameState, config: GameConfig) -> Engine<MessageLog> {
    Engine::builder(MessageLog::default())
        .config(config)
        .catalog(Catalog::new())
        .initial_state(state)
        .build()
        .unwrap()
}

/// Drains the current round, returning every activation in order.
fn drain(engine: &mut Engine<MessageLog>, player: &mut dyn DecisionSource) -> Vec<Activation> {
    let mut activations = Vec::new();
    while let Some(activation) = engine.process_one_activation(player).unwrap() {
        activations.push(activation);
    }
    activations
}

/// Two rooms split by a wall so the monster never sees the player.
fn split_rooms(monster: &ActorTemplate) -> (GameState, EntityId) {
    let mut floor = FloorState::walled_room(1, 12, 8);
    for y in 1..7 {
        floor.set_tile(Position::new(6, y), TileFlags::WALL);
    }
    let mut state = GameState::new(17, floor);
    place_player(&mut state, &hero(), Position::new(2, 2));
    let id = lifecycle::spawn_actor(&mut state, monster, Position::new(9, 4)).unwrap();
    (state, id)
}

#[test]
fn faster_actors_act_at_least_as_often() {
    let slow = ActorTemplate::builder("Snail").speed(50).build();
    let (state, snail) = split_rooms(&slow);
    let mut engine = engine_for(state, GameConfig::default());

    let (mut player_turns, mut snail_turns) = (0, 0);
    for _ in 0..20 {
        engine.start_round();
        for activation in drain(&mut engine, &mut WaitDecisions) {
            if let Activation::Performed { actor, .. } = activation {
                if actor == EntityId::PLAYER {
                    player_turns += 1;
                } else if actor == snail {
                    snail_turns += 1;
                }
            }
            for actor in engine.state().floor().living_actors() {
                assert!(actor.fighter.energy >= 0, "{} went negative", actor.name);
            }
        }
    }

    assert_eq!(player_turns, 20);
    assert_eq!(snail_turns, 10);
}

#[test]
fn energy_drops_by_exactly_the_cost() {
    let (state, _) = split_rooms(&ActorTemplate::builder("Orc").build());
    let mut engine = engine_for(state, GameConfig::default());
    let mut script = ScriptedDecisions::new([
        ActionKind::Bump(BumpAction::new(Direction::North)),
        ActionKind::Bump(BumpAction::new(Direction::North)),
        ActionKind::Bump(BumpAction::new(Direction::North)),
    ]);

    for _ in 0..3 {
        engine.start_round();
        loop {
            let Some(next) = engine.state().turn.scheduler.peek() else {
                break;
            };
            let before = engine.state().actor(next).unwrap().fighter.energy;
            let Some(activation) = engine.process_one_activation(&mut script).unwrap() else {
                break;
            };
            let after = engine.state().actor(next).unwrap().fighter.energy;
            match activation {
                Activation::Performed { report, .. } => assert_eq!(after, before - report.cost),
                _ => assert_eq!(after, before),
            }
        }
    }
    // The second bump hits the wall at y = 0 and is refused.
    assert_eq!(engine.state().player().unwrap().position, Position::new(2, 1));
    assert_eq!(script.rejections().len(), 2);
}

#[test]
fn melee_until_death_awards_xp_once() {
    let mut state = GameState::new(23, FloorState::walled_room(1, 8, 8));
    place_player(&mut state, &hero(), Position::new(2, 2));
    let dummy = ActorTemplate::builder("Dummy")
        .stats(10, 0, 0)
        .xp_given(35)
        .build();
    let target = lifecycle::spawn_actor(&mut state, &dummy, Position::new(3, 2)).unwrap();
    state.actor_mut(target).unwrap().controller = Controller::Inert;

    let config = GameConfig::default().with_hit_chance_base(1.0);
    let mut engine = engine_for(state, config);
    let mut deaths = 0;
    let mut first_hit = None;

    for _ in 0..10 {
        if !engine.state().is_alive(target) {
            break;
        }
        let mut script = ScriptedDecisions::new([ActionKind::Melee(MeleeAction::new(
            Direction::East,
        ))]);
        engine.run_round(&mut script).unwrap();

        deaths = engine
            .sink()
            .messages()
            .filter(|message| message.tag == ColorTag::EnemyDie)
            .count();

        if first_hit.is_none() {
            let hp = engine.state().actor(target).unwrap().fighter.hp();
            first_hit = Some(hp);
        }
    }

    let first_hp = first_hit.unwrap();
    assert!(first_hp < 10);
    assert!(!engine.state().is_alive(target));
    assert_eq!(deaths, 1);
    assert_eq!(engine.state().player().unwrap().level.current_xp, 35);
    assert_eq!(engine.state().actor(target).unwrap().name, "remains of Dummy");
}

#[test]
fn first_hit_takes_exactly_the_rolled_damage() {
    let mut state = GameState::new(5, FloorState::walled_room(1, 8, 8));
    place_player(&mut state, &hero(), Position::new(2, 2));
    let dummy = ActorTemplate::builder("Dummy").stats(10, 0, 0).build();
    let target = lifecycle::spawn_actor(&mut state, &dummy, Position::new(3, 2)).unwrap();
    state.actor_mut(target).unwrap().controller = Controller::Inert;

    let mut engine = engine_for(state, GameConfig::default().with_hit_chance_base(1.0));
    let mut script =
        ScriptedDecisions::new([ActionKind::Melee(MeleeAction::new(Direction::East))]);
    engine.start_round();
    let activation = engine.process_one_activation(&mut script).unwrap().unwrap();

    let Activation::Performed { report, .. } = activation else {
        panic!("melee should be performed, got {activation:?}");
    };
    let damage = report
        .events
        .iter()
        .find_map(|event| match event {
            GameEvent::Attacked {
                outcome: AttackOutcome::Hit { damage },
                ..
            } => Some(*damage),
            _ => None,
        })
        .unwrap();
    assert!((5..=7).contains(&damage));
    assert_eq!(engine.state().actor(target).unwrap().fighter.hp(), 10 - damage);
}

#[test]
fn bumping_a_door_opens_it_then_walks_through() {
    let mut floor = FloorState::walled_room(1, 8, 8);
    floor.set_tile(Position::new(3, 2), TileFlags::CLOSED_DOOR);
    let mut state = GameState::new(3, floor);
    place_player(&mut state, &hero(), Position::new(2, 2));
    let mut engine = engine_for(state, GameConfig::default());

    let mut script = ScriptedDecisions::new([ActionKind::Bump(BumpAction::new(Direction::East))]);
    engine.start_round();
    let opened = engine.process_one_activation(&mut script).unwrap().unwrap();
    assert!(matches!(
        opened,
        Activation::Performed { ref report, .. } if matches!(report.kind, ActionKind::OpenDoor(_))
    ));
    assert!(!engine.state().floor().tile(Position::new(3, 2)).is_closed_door());

    script.push(ActionKind::Bump(BumpAction::new(Direction::East)));
    engine.run_round(&mut script).unwrap();
    assert_eq!(engine.state().player().unwrap().position, Position::new(3, 2));
}

#[test]
fn refused_monsters_wait_instead_of_saving_energy() {
    let mut floor = FloorState::walled_room(1, 7, 3);
    floor.set_tile(Position::new(2, 1), TileFlags::WALL);
    let mut state = GameState::new(9, floor);
    place_player(&mut state, &hero(), Position::new(5, 1));
    let stumbler = ActorTemplate::builder("Drunk").ai(AiKind::ConfusedWalk).build();
    let drunk = lifecycle::spawn_actor(&mut state, &stumbler, Position::new(1, 1)).unwrap();
    let mut engine = engine_for(state, GameConfig::default());

    engine.start_round();
    let activations = drain(&mut engine, &mut WaitDecisions);

    assert!(activations.iter().any(|activation| matches!(
        activation,
        Activation::Performed { actor, report }
            if *actor == drunk && matches!(report.kind, ActionKind::Wait(_))
    )));
    assert_eq!(engine.state().actor(drunk).unwrap().fighter.energy, 0);
    assert_eq!(engine.state().turn.nonce, 2);
    assert!(
        engine
            .sink()
            .messages()
            .all(|message| message.tag != ColorTag::Impossible)
    );
}

#[test]
fn blocked_monsters_do_not_burst_once_the_way_clears() {
    let mut state = GameState::new(13, FloorState::walled_room(1, 7, 3));
    place_player(&mut state, &hero(), Position::new(1, 1));
    let crate_template = ActorTemplate::builder("Crate").stats(5, 0, 0).build();
    let blocker = lifecycle::spawn_actor(&mut state, &crate_template, Position::new(2, 1)).unwrap();
    state.actor_mut(blocker).unwrap().controller = Controller::Inert;
    let orc = ActorTemplate::builder("Orc")
        .stats(10, 3, 0)
        .ai(AiKind::MeleeChaser)
        .build();
    let orc = lifecycle::spawn_actor(&mut state, &orc, Position::new(3, 1)).unwrap();
    let mut engine = engine_for(state, GameConfig::default());

    let orc_turns = |activations: &[Activation]| {
        activations
            .iter()
            .filter(|activation| matches!(activation, Activation::Performed { actor, .. } if *actor == orc))
            .count()
    };

    for _ in 0..10 {
        engine.start_round();
        let activations = drain(&mut engine, &mut WaitDecisions);
        assert_eq!(orc_turns(&activations), 1);
        assert_eq!(engine.state().actor(orc).unwrap().fighter.energy, 0);
    }
    assert_eq!(engine.state().actor(orc).unwrap().position, Position::new(3, 1));

    let mut events = Vec::new();
    assert!(lifecycle::die(engine.state_mut(), blocker, &mut events));

    engine.start_round();
    let activations = drain(&mut engine, &mut WaitDecisions);
    assert_eq!(orc_turns(&activations), 1);
    assert_eq!(engine.state().actor(orc).unwrap().position, Position::new(2, 1));
}

#[test]
fn free_actions_do_not_wear_down_statuses() {
    let mut state = GameState::new(21, FloorState::walled_room(1, 8, 8));
    place_player(&mut state, &hero(), Position::new(2, 2));
    state.actor_mut(EntityId::PLAYER).unwrap().level.current_xp = 10_000;
    let mut events = Vec::new();
    effects::apply_status(
        &mut state,
        EntityId::PLAYER,
        StatusEffect::new(StatusKind::Grappled, 3),
        EntityId::SYSTEM,
        &mut events,
    );
    let mut engine = engine_for(state, GameConfig::default());
    let remaining = |engine: &Engine<MessageLog>| {
        engine
            .state()
            .player()
            .unwrap()
            .status
            .get(StatusKind::Grappled)
            .map(|instance| instance.remaining)
    };

    let mut script = ScriptedDecisions::new([ActionKind::LevelUp(LevelUpAction {
        choice: LevelUpChoice::Strength,
    })]);
    engine.run_round(&mut script).unwrap();
    assert_eq!(engine.state().player().unwrap().level.current_level, 1);
    assert_eq!(remaining(&engine), Some(3));

    engine.run_round(&mut WaitDecisions).unwrap();
    assert_eq!(remaining(&engine), Some(2));
}

#[test]
fn taking_the_stairs_ends_the_round() {
    let floor = |name: &str, upstairs: Option<Position>, downstairs: Option<Position>| {
        let room = FloorState::walled_room(0, 8, 6);
        FloorBlueprint {
            name: name.into(),
            width: room.width(),
            height: room.height(),
            tiles: room.positions().map(|position| room.tile(position)).collect(),
            upstairs,
            downstairs,
            player_start: Some(Position::new(2, 2)),
            spawns: vec![],
        }
    };
    let mut catalog = Catalog::new();
    catalog.insert_actor(
        Catalog::PLAYER_KEY,
        ActorTemplate::builder("Player").player(26).speed(200).build(),
    );
    catalog.push_floor(floor("entrance", Some(Position::new(2, 2)), None));
    catalog.push_floor(floor("gallery", None, Some(Position::new(5, 3))));

    let mut engine = Engine::builder(MessageLog::default())
        .catalog(catalog)
        .seed(1)
        .build()
        .unwrap();
    let mut script = ScriptedDecisions::new([
        ActionKind::TakeStairs(TakeStairsAction),
        ActionKind::TakeStairs(TakeStairsAction),
    ]);
    let activations = engine.run_round(&mut script).unwrap();

    assert_eq!(activations, 1);
    assert_eq!(script.remaining(), 1);
    assert_eq!(engine.state().floor().depth, 2);
    let player = engine.state().player().unwrap();
    assert_eq!(player.position, Position::new(5, 3));
    assert_eq!(player.fighter.energy, 100);
    assert_eq!(
        engine.sink().last().unwrap().text,
        "You ascend the staircase."
    );
}

#[test]
fn monsters_hunt_the_player_down() {
    let mut state = GameState::new(31, FloorState::walled_room(1, 10, 6));
    place_player(&mut state, &hero(), Position::new(1, 1));
    let orc = ActorTemplate::builder("Orc")
        .stats(10, 3, 0)
        .ai(AiKind::MeleeChaser)
        .build();
    let id = lifecycle::spawn_actor(&mut state, &orc, Position::new(8, 4)).unwrap();
    let mut engine = engine_for(state, GameConfig::default());

    for _ in 0..12 {
        engine.run_round(&mut WaitDecisions).unwrap();
    }

    let orc = engine.state().actor(id).unwrap();
    assert_eq!(orc.position.chebyshev(Position::new(1, 1)), 1);
    assert!(
        engine
            .sink()
            .messages()
            .any(|message| message.tag == ColorTag::EnemyAttack)
    );
}
