pub mod actor;
pub mod common;
pub mod control;
pub mod floor;
pub mod item;
pub mod scheduler;
pub mod turn;

pub use actor::{
    ActorState, DeathTrigger, Equipment, Fighter, InventoryState, Level, OnHitEffect,
    OnHitEffects, StatusEffect, StatusEffectInstance, StatusEffects, StatusKind,
};
pub use common::{DamageRange, Direction, EntityId, Position, Rgb};
pub use control::{AiKind, AiMemory, AiState, Controller};
pub use floor::{FloorState, GroundItem, TileFlags};
pub use item::{AmmoType, Consumable, EquipmentSlot, Equippable, ItemKind, ItemState};
pub use scheduler::TurnScheduler;
pub use turn::{BoostStat, DelayedEffect, ScheduledEffect, TurnState};
