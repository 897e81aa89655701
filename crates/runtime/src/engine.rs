//! Round loop of the simulation.
//!
//! The [`Engine`] owns the authoritative [`GameState`] together with the
//! collaborators the rules need (vision, randomness, content) and the
//! narration sink. A round looks like this:
//!
//! 1. [`Engine::start_round`] grants every living actor its speed in
//!    energy, fires scheduled effects and fills the scheduler.
//! 2. [`Engine::process_one_activation`] pops the actor with the most
//!    energy, asks its decision source for an action and performs it. The
//!    actor goes back into the queue for as long as it still has energy.
//! 3. The round is over once the queue drains, see
//!    [`Engine::is_round_complete`].
//!
//! Refusals (`Impossible`, `InvalidInput`) are handled here and never leave
//! the loop. Everything else is surfaced as an [`EngineError`].

use delve_content::Catalog;
use delve_core::{
    Action, ActionKind, ActionReport, ColorTag, Controller, EntityId, ErrorSeverity, ExecuteError,
    GameConfig,
    GameEngine, GameEnv, GameError, GameState, MessageSink, OracleError, PcgRng, Position,
    VisionOracle, effects, lifecycle,
};

use crate::ai::{self, AiContext};
use crate::decision::{DecisionContext, DecisionSource};
use crate::error::{EngineError, Result};
use crate::narration::{self, WELCOME};
use crate::repository::{SaveGame, SaveRepository};
use crate::vision::GridVision;

/// What happened during one activation.
#[derive(Clone, Debug, PartialEq)]
pub enum Activation {
    /// The action ran and its cost was paid.
    Performed { actor: EntityId, report: ActionReport },

    /// The chosen action costs more energy than the actor has. It is kept
    /// and replayed at the actor's next activation.
    Deferred { actor: EntityId, cost: i32 },

    /// The player's action was refused; the player is still queued.
    Rejected { actor: EntityId, reason: String },

    /// The player did not act and leaves the round, or the queued actor
    /// is gone.
    Passed { actor: EntityId },
}

impl Activation {
    pub fn actor(&self) -> EntityId {
        match self {
            Self::Performed { actor, .. }
            | Self::Deferred { actor, .. }
            | Self::Rejected { actor, .. }
            | Self::Passed { actor } => *actor,
        }
    }
}

/// Where the action of an activation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Input,
    Ai,
    Deferred { interactive: bool },
}

impl Origin {
    /// Refusals of interactive choices are reported back and the actor may
    /// choose again; monsters wait instead.
    fn is_interactive(self) -> bool {
        match self {
            Self::Input => true,
            Self::Ai => false,
            Self::Deferred { interactive } => interactive,
        }
    }
}

pub struct Engine<S: MessageSink> {
    state: GameState,
    config: GameConfig,
    rng: PcgRng,
    vision: GridVision,
    catalog: Catalog,
    sink: S,
}

impl<S: MessageSink> Engine<S> {
    pub fn builder(sink: S) -> EngineBuilder<S> {
        EngineBuilder::new(sink)
    }

    /// Rebuilds an engine around a snapshot taken with [`Self::snapshot`].
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or undecodable bytes.
    pub fn from_snapshot(
        bytes: &[u8],
        catalog: Catalog,
        config: GameConfig,
        sink: S,
    ) -> Result<Self> {
        config.validate()?;
        let state = GameState::from_snapshot(bytes)?;
        Ok(Self::assemble(state, config, catalog, sink))
    }

    fn assemble(state: GameState, config: GameConfig, catalog: Catalog, sink: S) -> Self {
        let vision = GridVision::new(config.blocked_path_penalty);
        let mut engine = Self {
            state,
            config,
            rng: PcgRng,
            vision,
            catalog,
            sink,
        };
        engine.refresh_fov();
        engine
    }

    /// Opens a new round.
    pub fn start_round(&mut self) {
        self.state.turn.round += 1;
        let round = self.state.turn.round;

        for actor in self.state.floor_mut().actors.values_mut() {
            if actor.alive {
                actor.fighter.energy += actor.fighter.base_speed;
            }
        }

        let events = GameEngine::new(&mut self.state).fire_due_effects(round);
        narration::narrate_all(&events, &mut self.sink);
        self.refresh_fov();

        let eligible: Vec<(EntityId, i32)> = self
            .state
            .floor()
            .living_actors()
            .filter(|actor| !matches!(actor.controller, Controller::Inert))
            .map(|actor| (actor.id, actor.fighter.energy))
            .collect();
        let scheduler = &mut self.state.turn.scheduler;
        scheduler.clear();
        for (id, energy) in eligible {
            scheduler.add(id, energy);
        }

        tracing::debug!(
            round,
            queued = scheduler.len(),
            fired = events.len(),
            "round started"
        );
    }

    /// Runs the next actor in the queue.
    ///
    /// Returns `Ok(None)` when the round has nobody left to run.
    ///
    /// # Errors
    ///
    /// Any failure other than a refusal ends the round with
    /// [`EngineError::Execute`].
    pub fn process_one_activation(
        &mut self,
        player: &mut dyn DecisionSource,
    ) -> Result<Option<Activation>> {
        if self.is_round_complete() {
            return Ok(None);
        }

        let actor = self.state.turn.scheduler.next();
        if !self.state.is_alive(actor) {
            tracing::trace!(%actor, "skipping actor that is gone");
            return Ok(Some(Activation::Passed { actor }));
        }

        self.state.turn.current_actor = Some(actor);
        let activation = self.activate(actor, player);
        self.state.turn.current_actor = None;
        activation.map(Some)
    }

    fn activate(
        &mut self,
        actor: EntityId,
        player: &mut dyn DecisionSource,
    ) -> Result<Activation> {
        let Some((action, origin)) = self.choose(actor, player) else {
            if self.is_player_controlled(actor) {
                return Ok(Activation::Passed { actor });
            }
            return self.stand_by(actor);
        };

        if !action.can_perform(&self.state) {
            tracing::debug!(%actor, action = action.kind.as_str(), cost = action.cost, "deferring action");
            let cost = action.cost;
            self.state.turn.deferred.insert(actor, action);
            return Ok(Activation::Deferred { actor, cost });
        }

        match self.perform(&action) {
            Ok(report) => Ok(self.complete(report)),
            Err(error) if error.severity().is_recoverable() => {
                let reason = error.reason().unwrap_or_else(|| error.to_string());
                if origin.is_interactive() {
                    let tag = match error.severity() {
                        ErrorSeverity::InvalidInput => ColorTag::InvalidInput,
                        _ => ColorTag::Impossible,
                    };
                    self.sink.add_message(reason.clone(), tag);
                    player.on_rejected(&action, &reason);
                    let energy = self.energy_of(actor);
                    self.state.turn.scheduler.add(actor, energy);
                    Ok(Activation::Rejected { actor, reason })
                } else {
                    tracing::debug!(%actor, action = action.kind.as_str(), %reason, "monster action refused");
                    self.stand_by(actor)
                }
            }
            Err(source) => {
                tracing::error!(%actor, action = action.kind.as_str(), error = %source, "action failed");
                Err(EngineError::Execute { actor, source })
            }
        }
    }

    /// Spends a regular wait for a monster that has nothing it may do, so
    /// unused energy never carries over into later rounds.
    fn stand_by(&mut self, actor: EntityId) -> Result<Activation> {
        let wait = Action::wait(actor, &self.config);
        if !wait.can_perform(&self.state) {
            let cost = wait.cost;
            self.state.turn.deferred.insert(actor, wait);
            return Ok(Activation::Deferred { actor, cost });
        }
        match self.perform(&wait) {
            Ok(report) => Ok(self.complete(report)),
            Err(source) => {
                tracing::error!(%actor, error = %source, "wait failed");
                Err(EngineError::Execute { actor, source })
            }
        }
    }

    fn perform(&mut self, action: &Action) -> std::result::Result<ActionReport, ExecuteError> {
        let env = GameEnv::new(&self.config, &self.rng)
            .with_vision(&self.vision)
            .with_catalog(&self.catalog)
            .with_floors(&self.catalog);
        GameEngine::new(&mut self.state).perform(&env, action)
    }

    fn is_player_controlled(&self, actor: EntityId) -> bool {
        self.state
            .actor(actor)
            .is_some_and(|state| state.controller.is_player())
    }

    /// Deferred action first, then the actor's own decision source.
    fn choose(
        &mut self,
        actor: EntityId,
        player: &mut dyn DecisionSource,
    ) -> Option<(Action, Origin)> {
        let interactive = self.is_player_controlled(actor);
        if let Some(action) = self.state.turn.deferred.remove(&actor) {
            return Some((action, Origin::Deferred { interactive }));
        }

        let controller = self.state.actor(actor)?.controller.clone();
        match controller {
            Controller::Player => {
                let ctx = DecisionContext {
                    actor,
                    state: &self.state,
                    config: &self.config,
                    vision: &self.vision,
                };
                player
                    .next_action(&ctx)
                    .map(|action| (action, Origin::Input))
            }
            Controller::Ai(ai) => {
                let mut memory = ai.memory;
                let action = {
                    let env = GameEnv::new(&self.config, &self.rng).with_vision(&self.vision);
                    let state = self.state.actor(actor)?;
                    let ctx = AiContext::new(state, &self.state, env);
                    ai::decide(&ai.kind, &mut memory, &ctx)
                };
                if let Some(Controller::Ai(stored)) = self
                    .state
                    .actor_mut(actor)
                    .map(|state| &mut state.controller)
                {
                    stored.memory = memory;
                }
                action.map(|action| (action, Origin::Ai))
            }
            Controller::Inert => None,
        }
    }

    fn complete(&mut self, report: ActionReport) -> Activation {
        let actor = report.actor;
        narration::narrate_all(&report.events, &mut self.sink);

        // Free actions do not count as a turn for status durations.
        if report.cost > 0 {
            let mut expired = Vec::new();
            effects::tick(&mut self.state, actor, &mut expired);
            narration::narrate_all(&expired, &mut self.sink);
        }

        self.refresh_fov();

        let changed_floor = matches!(report.kind, ActionKind::TakeStairs(_));
        if !changed_floor && self.state.is_alive(actor) {
            let energy = self.energy_of(actor);
            self.state.turn.scheduler.add(actor, energy);
        }

        tracing::debug!(
            %actor,
            action = report.kind.as_str(),
            cost = report.cost,
            energy = self.energy_of(actor),
            "activation performed"
        );
        Activation::Performed { actor, report }
    }

    fn energy_of(&self, actor: EntityId) -> i32 {
        self.state
            .actor(actor)
            .map_or(0, |state| state.fighter.energy)
    }

    /// Recomputes the player's field of view and marks it explored.
    fn refresh_fov(&mut self) {
        let Some(viewer) = self.state.player().map(|player| player.position) else {
            return;
        };
        self.vision
            .refresh(self.state.floor(), viewer, self.config.fov_radius);
        let seen: Vec<Position> = self.vision.visible_positions().collect();
        let floor = self.state.floor_mut();
        for position in seen {
            floor.mark_explored(position);
        }
    }

    /// True once nobody is queued or the game ended.
    pub fn is_round_complete(&self) -> bool {
        !self.state.turn.scheduler.has_pending() || self.state.is_game_over()
    }

    /// Starts a round and drains it. Returns the number of activations.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal activation error.
    pub fn run_round(&mut self, player: &mut dyn DecisionSource) -> Result<usize> {
        self.start_round();
        let mut activations = 0;
        while let Some(activation) = self.process_one_activation(player)? {
            tracing::trace!(actor = %activation.actor(), "activation finished");
            activations += 1;
        }
        if self.state.is_game_over() {
            tracing::info!(
                round = self.state.turn.round,
                victory = self.state.victory,
                "game over"
            );
        }
        Ok(activations)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Opaque bytes of the whole game.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Snapshot`] if encoding fails.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(self.state.to_snapshot()?)
    }

    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn save(&self, repository: &dyn SaveRepository, slot: &str) -> Result<()> {
        repository.save(slot, &SaveGame::capture(&self.state))?;
        tracing::info!(slot, round = self.state.turn.round, "game saved");
        Ok(())
    }

    /// Replaces the running game with the one saved in `slot`. Returns
    /// `false` and leaves the game untouched when the slot is empty.
    ///
    /// # Errors
    ///
    /// Propagates repository failures and incompatible saves.
    pub fn load(&mut self, repository: &dyn SaveRepository, slot: &str) -> Result<bool> {
        let Some(save) = repository.load(slot)? else {
            return Ok(false);
        };
        self.state = save.into_state()?;
        self.refresh_fov();
        tracing::info!(slot, round = self.state.turn.round, "game loaded");
        Ok(true)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tools and tests; changes bypass the rules.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn vision(&self) -> &GridVision {
        &self.vision
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Builder for [`Engine`].
pub struct EngineBuilder<S: MessageSink> {
    sink: S,
    config: GameConfig,
    catalog: Option<Catalog>,
    seed: u64,
    state: Option<GameState>,
}

impl<S: MessageSink> EngineBuilder<S> {
    fn new(sink: S) -> Self {
        Self {
            sink,
            config: GameConfig::default(),
            catalog: None,
            seed: 0,
            state: None,
        }
    }

    /// Override the rule configuration
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required content catalog
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Seed of a new game; ignored when an initial state is given
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Resume from an existing state instead of starting a new game
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the engine
    ///
    /// # Errors
    ///
    /// Fails without a catalog, on an invalid configuration, or when the
    /// catalog cannot produce the first floor and the player.
    pub fn build(self) -> Result<Engine<S>> {
        self.config.validate()?;
        let catalog = self.catalog.ok_or(EngineError::MissingCatalog)?;

        let (state, fresh) = match self.state {
            Some(state) => (state, false),
            None => {
                let blueprint = delve_core::FloorOracle::floor(&catalog, 1)
                    .ok_or(EngineError::NoFloor(1))?;
                let hero = catalog.player().ok_or_else(|| {
                    EngineError::InitialState(OracleError::ActorTemplateNotFound(
                        Catalog::PLAYER_KEY.to_owned(),
                    ))
                })?;
                let state = lifecycle::new_game(self.seed, &blueprint, hero, &catalog)
                    .map_err(EngineError::InitialState)?;
                (state, true)
            }
        };

        let mut engine = Engine::assemble(state, self.config, catalog, self.sink);
        if fresh {
            engine.sink.add_message(WELCOME.to_owned(), ColorTag::Welcome);
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{ScriptedDecisions, WaitDecisions};
    use crate::log::MessageLog;
    use delve_core::{
        ActorTemplate, AiKind, Direction, FloorBlueprint, MoveAction, SpawnKind, SpawnSpec,
        TileFlags,
    };

    fn open_floor(spawns: Vec<SpawnSpec>) -> FloorBlueprint {
        let (width, height) = (10, 6);
        let mut tiles = vec![TileFlags::FLOOR; (width * height) as usize];
        for x in 0..width {
            tiles[x as usize] = TileFlags::WALL;
            tiles[((height - 1) * width + x) as usize] = TileFlags::WALL;
        }
        for y in 0..height {
            tiles[(y * width) as usize] = TileFlags::WALL;
            tiles[(y * width + width - 1) as usize] = TileFlags::WALL;
        }
        FloorBlueprint {
            name: "test".into(),
            width,
            height,
            tiles,
            upstairs: None,
            downstairs: None,
            player_start: Some(Position::new(1, 1)),
            spawns,
        }
    }

    fn catalog(spawns: Vec<SpawnSpec>) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_actor(
            Catalog::PLAYER_KEY,
            ActorTemplate::builder("Player").player(26).build(),
        );
        catalog.insert_actor(
            "sloth",
            ActorTemplate::builder("Sloth")
                .speed(50)
                .ai(AiKind::MeleeChaser)
                .build(),
        );
        catalog.push_floor(open_floor(spawns));
        catalog
    }

    fn engine(spawns: Vec<SpawnSpec>) -> Engine<MessageLog> {
        Engine::builder(MessageLog::default())
            .catalog(catalog(spawns))
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_a_catalog() {
        let result = Engine::builder(MessageLog::default()).build();
        assert!(matches!(result, Err(EngineError::MissingCatalog)));
    }

    #[test]
    fn new_games_are_welcomed() {
        let engine = engine(vec![]);
        let last = engine.sink().last().unwrap();
        assert_eq!(last.text, WELCOME);
        assert_eq!(last.tag, ColorTag::Welcome);
        assert!(engine.vision().is_visible(Position::new(2, 2)));
    }

    #[test]
    fn rounds_grant_speed_as_energy() {
        let mut engine = engine(vec![]);
        engine.start_round();
        assert_eq!(engine.state().turn.round, 1);
        assert_eq!(engine.state().player().unwrap().fighter.energy, 100);
        assert!(engine.state().turn.scheduler.contains(EntityId::PLAYER));
    }

    #[test]
    fn player_acts_once_per_round_at_base_speed() {
        let mut engine = engine(vec![]);
        let activations = engine.run_round(&mut WaitDecisions).unwrap();
        assert_eq!(activations, 1);
        assert_eq!(engine.state().player().unwrap().fighter.energy, 0);
        assert_eq!(engine.state().turn.nonce, 1);
        assert!(engine.is_round_complete());
    }

    #[test]
    fn refused_player_actions_keep_the_player_queued() {
        let mut engine = engine(vec![]);
        let mut script = ScriptedDecisions::new([
            ActionKind::Move(MoveAction::new(Direction::North)),
            ActionKind::Move(MoveAction::new(Direction::South)),
        ]);
        engine.start_round();

        let first = engine.process_one_activation(&mut script).unwrap().unwrap();
        assert!(matches!(first, Activation::Rejected { .. }));
        assert_eq!(engine.state().player().unwrap().fighter.energy, 100);
        assert_eq!(engine.sink().last().unwrap().tag, ColorTag::Impossible);

        let second = engine.process_one_activation(&mut script).unwrap().unwrap();
        assert!(matches!(second, Activation::Performed { .. }));
        assert_eq!(
            engine.state().player().unwrap().position,
            Position::new(1, 2)
        );
        assert_eq!(script.rejections().len(), 1);
    }

    #[test]
    fn slow_monsters_defer_until_they_can_pay() {
        let spawns = vec![SpawnSpec {
            position: Position::new(8, 4),
            kind: SpawnKind::Actor("sloth".into()),
        }];
        let mut engine = engine(spawns);
        let sloth = engine
            .state()
            .floor()
            .living_actors()
            .find(|actor| actor.name == "Sloth")
            .map(|actor| actor.id)
            .unwrap();

        engine.start_round();
        let mut outcomes = Vec::new();
        while let Some(activation) = engine.process_one_activation(&mut WaitDecisions).unwrap() {
            outcomes.push(activation);
        }
        assert!(outcomes.contains(&Activation::Deferred {
            actor: sloth,
            cost: 100
        }));
        assert!(engine.state().turn.deferred.contains_key(&sloth));

        engine.run_round(&mut WaitDecisions).unwrap();
        assert!(!engine.state().turn.deferred.contains_key(&sloth));
        assert_eq!(engine.state().actor(sloth).unwrap().fighter.energy, 0);
    }

    #[test]
    fn snapshots_resume_the_same_game() {
        let mut engine = engine(vec![]);
        engine.run_round(&mut WaitDecisions).unwrap();
        let bytes = engine.snapshot().unwrap();

        let restored =
            Engine::from_snapshot(&bytes, catalog(vec![]), GameConfig::default(), MessageLog::default())
                .unwrap();
        assert_eq!(restored.state(), engine.state());
        assert!(restored.sink().is_empty());
    }
}
