//! Turns structured [`GameEvent`]s into narration lines.
//!
//! Monster-only bookkeeping (movement, opened doors) stays silent; the
//! player only hears about what it could notice.
use delve_core::{AttackOutcome, ColorTag, EntityId, GameEvent, MessageSink, StatusKind};

pub const WELCOME: &str =
    "As you step into the darkness, a malevolent laughter echoes from the castle!";

/// Narration for one event, if it has any.
pub fn narrate(event: &GameEvent) -> Option<(String, ColorTag)> {
    let line = match event {
        GameEvent::Moved { .. } | GameEvent::Bled { .. } | GameEvent::StatusRefreshed { .. } => {
            return None;
        }
        GameEvent::ItemUnderfoot { actor, item } if actor.is_player() => {
            (format!("There is a {item} here."), ColorTag::Neutral)
        }
        GameEvent::DoorOpened { actor, .. } if actor.is_player() => {
            ("You open the door.".to_owned(), ColorTag::Neutral)
        }
        GameEvent::Attacked {
            attacker,
            attacker_name,
            target_name,
            outcome,
            ranged,
        ..
        } => {
            let verb = if *ranged { "shoots at" } else { "attacks" };
            let desc = format!("{} {verb} {target_name}", capitalize(attacker_name));
            let text = match outcome {
                AttackOutcome::Miss => format!("{desc} but misses."),
                AttackOutcome::NoDamage => format!("{desc} but does no damage."),
                AttackOutcome::Hit { damage } => format!("{desc} for {damage} hit points."),
            };
            (text, attack_tag(*attacker))
        }
        GameEvent::Died { entity, name, .. } => {
            if entity.is_player() {
                ("You died!".to_owned(), ColorTag::PlayerDie)
            } else {
                (format!("{} is dead!", capitalize(name)), ColorTag::EnemyDie)
            }
        }
        GameEvent::XpGained { amount, .. } => {
            (format!("You gain {amount} experience points."), ColorTag::Neutral)
        }
        GameEvent::LeveledUp { level, .. } => {
            (format!("You advance to level {level}!"), ColorTag::LevelUp)
        }
        GameEvent::StatusApplied { target, name, kind } => {
            (status_applied(*target, name, *kind), ColorTag::StatusApplied)
        }
        GameEvent::StatusExpired { target, name, kind } => {
            (status_expired(*target, name, *kind), ColorTag::StatusExpired)
        }
        GameEvent::Healed { actor, name, amount } => {
            let text = if actor.is_player() {
                format!("You recover {amount} HP!")
            } else {
                format!("The {name} recovers {amount} HP.")
            };
            (text, ColorTag::HealthRecovered)
        }
        GameEvent::PickedUp { actor, item } if actor.is_player() => {
            (format!("You picked up the {item}!"), ColorTag::Neutral)
        }
        GameEvent::Dropped { actor, item } if actor.is_player() => {
            (format!("You dropped the {item}."), ColorTag::Neutral)
        }
        GameEvent::Equipped { actor, item, .. } if actor.is_player() => {
            (format!("You equip the {item}."), ColorTag::Neutral)
        }
        GameEvent::Unequipped { actor, item, .. } if actor.is_player() => {
            (format!("You remove the {item}."), ColorTag::Neutral)
        }
        GameEvent::BoostStarted { stat, amount, .. } => {
            (format!("Your {stat} increases by {amount}!"), ColorTag::Boost)
        }
        GameEvent::BoostFaded { stat, source, .. } => (
            format!("The effect of the {source} wears off, and your {stat} returns to normal."),
            ColorTag::BoostFaded,
        ),
        GameEvent::LightningStruck { name, damage, .. } => (
            format!("A lightning bolt strikes the {name} with a loud thunder, for {damage} damage!"),
            ColorTag::PlayerAttack,
        ),
        GameEvent::Scorched { name, damage, .. } => (
            format!("The {name} is engulfed in a fiery explosion, taking {damage} damage!"),
            ColorTag::PlayerAttack,
        ),
        GameEvent::MapRevealed => (
            "The map reveals the layout of this floor!".to_owned(),
            ColorTag::Neutral,
        ),
        GameEvent::Summoned { name, count, .. } => {
            let text = if *count == 0 {
                format!("The {name} calls out, but nothing answers.")
            } else {
                format!("The {name} has summoned {count} minions!")
            };
            (text, ColorTag::EnemyAttack)
        }
        GameEvent::Pounced { name, .. } => (format!("The {name} pounces!"), ColorTag::EnemyAttack),
        GameEvent::FloorChanged { ascended, .. } => {
            let text = if *ascended {
                "You ascend the staircase."
            } else {
                "You descend the staircase."
            };
            (text.to_owned(), ColorTag::Descend)
        }
        GameEvent::Victory => (
            "The master of the castle is destroyed. You are victorious!".to_owned(),
            ColorTag::Victory,
        ),
        GameEvent::ItemConsumed { .. }
        | GameEvent::ItemUnderfoot { .. }
        | GameEvent::DoorOpened { .. }
        | GameEvent::PickedUp { .. }
        | GameEvent::Dropped { .. }
        | GameEvent::Equipped { .. }
        | GameEvent::Unequipped { .. } => return None,
    };
    Some(line)
}

/// Narrates every event into `sink`, in order.
pub fn narrate_all(events: &[GameEvent], sink: &mut dyn MessageSink) {
    for (text, tag) in events.iter().filter_map(narrate) {
        sink.add_message(text, tag);
    }
}

fn attack_tag(attacker: EntityId) -> ColorTag {
    if attacker.is_player() {
        ColorTag::PlayerAttack
    } else {
        ColorTag::EnemyAttack
    }
}

fn status_applied(target: EntityId, name: &str, kind: StatusKind) -> String {
    match (target.is_player(), kind) {
        (true, StatusKind::Grappled) => "You are grappled!".to_owned(),
        (true, StatusKind::Confused) => "Your head spins as you start to stumble around!".to_owned(),
        (false, StatusKind::Confused) => {
            format!("The eyes of the {name} look vacant, as it starts to stumble around!")
        }
        (true, kind) => format!("You are {kind}!"),
        (false, kind) => format!("The {name} is {kind}!"),
    }
}

fn status_expired(target: EntityId, name: &str, kind: StatusKind) -> String {
    match (target.is_player(), kind) {
        (true, StatusKind::Grappled) => "You break free.".to_owned(),
        (false, StatusKind::Grappled) => format!("The {name} breaks free."),
        (true, kind) => format!("You are no longer {kind}."),
        (false, kind) => format!("The {name} is no longer {kind}."),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::Position;

    fn attack(attacker: EntityId, outcome: AttackOutcome, ranged: bool) -> GameEvent {
        GameEvent::Attacked {
            attacker,
            attacker_name: "player".into(),
            target: EntityId(3),
            target_name: "Zombie".into(),
            outcome,
            ranged,
        }
    }

    #[test]
    fn attack_lines_follow_the_outcome() {
        let (text, tag) = narrate(&attack(EntityId::PLAYER, AttackOutcome::Hit { damage: 4 }, false)).unwrap();
        assert_eq!(text, "Player attacks Zombie for 4 hit points.");
        assert_eq!(tag, ColorTag::PlayerAttack);

        let (text, tag) = narrate(&attack(EntityId(2), AttackOutcome::Miss, true)).unwrap();
        assert_eq!(text, "Player shoots at Zombie but misses.");
        assert_eq!(tag, ColorTag::EnemyAttack);

        let (text, _) = narrate(&attack(EntityId::PLAYER, AttackOutcome::NoDamage, false)).unwrap();
        assert_eq!(text, "Player attacks Zombie but does no damage.");
    }

    #[test]
    fn deaths_distinguish_the_player() {
        let died = |entity| GameEvent::Died {
            entity,
            name: "bat".into(),
            position: Position::ORIGIN,
        };
        assert_eq!(
            narrate(&died(EntityId::PLAYER)),
            Some(("You died!".to_owned(), ColorTag::PlayerDie))
        );
        assert_eq!(
            narrate(&died(EntityId(5))),
            Some(("Bat is dead!".to_owned(), ColorTag::EnemyDie))
        );
    }

    #[test]
    fn monster_bookkeeping_is_silent() {
        let moved = GameEvent::Moved {
            actor: EntityId(4),
            from: Position::new(1, 1),
            to: Position::new(2, 1),
        };
        assert_eq!(narrate(&moved), None);
        let pickup = GameEvent::PickedUp {
            actor: EntityId(4),
            item: "dagger".into(),
        };
        assert_eq!(narrate(&pickup), None);
        let refreshed = GameEvent::StatusRefreshed {
            target: EntityId(4),
            kind: StatusKind::Grappled,
        };
        assert_eq!(narrate(&refreshed), None);
    }

    #[test]
    fn confusion_has_its_own_line() {
        let event = GameEvent::StatusApplied {
            target: EntityId(9),
            name: "Skeleton".into(),
            kind: StatusKind::Confused,
        };
        let (text, tag) = narrate(&event).unwrap();
        assert!(text.contains("look vacant"));
        assert_eq!(tag, ColorTag::StatusApplied);
    }
}
