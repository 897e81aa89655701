//! Deterministic rules of the dungeon.
//!
//! `delve-core` defines the canonical rules (actions, combat, status
//! effects, entity lifecycle) and the world state they act on, and exposes
//! pure APIs that the runtime and offline tools reuse. All action-driven
//! mutation flows through [`engine::GameEngine`]; collaborators such as
//! vision, randomness and content are injected through [`env::GameEnv`].
pub mod action;
pub mod combat;
pub mod config;
pub mod effects;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod state;

pub use action::{
    Action, ActionContext, ActionKind, ActionTransition, AttackError, BumpAction, DropAction,
    EquipAction, InventoryError, LevelUpAction, LevelUpChoice, MeleeAction, MoveAction,
    MoveError, OpenDoorAction, PickupAction, PounceAction, QuickHealAction, RangedAction,
    StairsError, SummonAction, TakeStairsAction, UseItemAction, WaitAction,
};
pub use combat::{AttackOutcome, AttackRoll, CombatReport};
pub use config::GameConfig;
pub use effects::Application;
pub use engine::{ActionReport, ExecuteError, GameEngine, TransitionPhase};
pub use env::{
    ActorTemplate, CatalogOracle, ColorTag, Dice, FighterStats, FloorBlueprint, FloorOracle,
    GameEnv, ItemTemplate, Message, MessageSink, OracleError, PcgRng, RngOracle, SpawnKind, SpawnSpec,
    StartingItem, VisionOracle,
};
pub use error::{ErrorSeverity, GameError};
pub use event::GameEvent;
pub use lifecycle::{DamageReport, SpawnError};
pub use state::{
    ActorState, AiKind, AiMemory, AiState, AmmoType, Consumable, Controller, DamageRange,
    DeathTrigger, Direction, EntityId, EquipmentSlot, Equippable, FloorState, GameState,
    ItemKind, ItemState, OnHitEffect, Position, Rgb, StatusEffect, StatusKind, TileFlags,
    TurnScheduler, TurnState, WorldState,
};
