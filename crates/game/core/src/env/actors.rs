//! Actor template definitions and the catalog oracle.
//!
//! Templates are immutable stat blocks. Spawning builds a fresh
//! [`ActorState`](crate::state::ActorState) from one, so no mutable
//! sub-object is ever shared between a template and its instances.

use crate::state::{AiKind, Controller, DamageRange, DeathTrigger, OnHitEffect, Rgb};

use super::ItemTemplate;

/// Base combat stats of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FighterStats {
    pub max_hp: i32,
    pub power: i32,
    pub defense: i32,
    pub accuracy: i32,
    pub speed: i32,
    pub damage: DamageRange,
    pub bleeds: bool,
}

impl Default for FighterStats {
    fn default() -> Self {
        Self {
            max_hp: 10,
            power: 0,
            defense: 0,
            accuracy: 100,
            speed: 100,
            damage: DamageRange::default(),
            bleeds: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartingItem {
    pub item: ItemTemplate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipped: bool,
}

/// Actor template defining everything except id and position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorTemplate {
    pub name: String,
    pub glyph: char,
    pub color: Rgb,
    #[cfg_attr(feature = "serde", serde(default = "default_remains_color"))]
    pub remains_color: Rgb,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: FighterStats,
    /// `None` marks the player-controlled template.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ai: Option<AiKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory_capacity: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_items: Vec<StartingItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hit: Vec<OnHitEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp_given: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level_up_base: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level_up_factor: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_death: Option<DeathTrigger>,
}

#[cfg(feature = "serde")]
fn default_remains_color() -> Rgb {
    Rgb::BLOOD
}

impl ActorTemplate {
    pub fn controller(&self) -> Controller {
        match &self.ai {
            Some(kind) => Controller::ai(kind.clone()),
            None => Controller::Player,
        }
    }

    pub fn builder(name: impl Into<String>) -> ActorTemplateBuilder {
        ActorTemplateBuilder::new(name)
    }
}

/// Builder for constructing actor templates in code and tests.
pub struct ActorTemplateBuilder {
    template: ActorTemplate,
}

impl ActorTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            template: ActorTemplate {
                name: name.into(),
                glyph: 'm',
                color: Rgb::WHITE,
                remains_color: Rgb::BLOOD,
                stats: FighterStats::default(),
                ai: Some(AiKind::MeleeChaser),
                inventory_capacity: 0,
                starting_items: Vec::new(),
                on_hit: Vec::new(),
                xp_given: 0,
                level_up_base: 0,
                level_up_factor: 0,
                on_death: None,
            },
        }
    }

    pub fn glyph(mut self, glyph: char) -> Self {
        self.template.glyph = glyph;
        self
    }

    pub fn stats(mut self, max_hp: i32, power: i32, defense: i32) -> Self {
        self.template.stats.max_hp = max_hp;
        self.template.stats.power = power;
        self.template.stats.defense = defense;
        self
    }

    pub fn speed(mut self, speed: i32) -> Self {
        self.template.stats.speed = speed;
        self
    }

    pub fn accuracy(mut self, accuracy: i32) -> Self {
        self.template.stats.accuracy = accuracy;
        self
    }

    pub fn damage(mut self, min: i32, max: i32) -> Self {
        self.template.stats.damage = DamageRange::new(min, max);
        self
    }

    pub fn bleeds(mut self, bleeds: bool) -> Self {
        self.template.stats.bleeds = bleeds;
        self
    }

    /// Marks the template as player-controlled and gives it a backpack.
    pub fn player(mut self, inventory_capacity: usize) -> Self {
        self.template.ai = None;
        self.template.inventory_capacity = inventory_capacity;
        self.template.level_up_base = 200;
        self.template.level_up_factor = 150;
        self
    }

    pub fn ai(mut self, kind: AiKind) -> Self {
        self.template.ai = Some(kind);
        self
    }

    pub fn inventory_capacity(mut self, capacity: usize) -> Self {
        self.template.inventory_capacity = capacity;
        self
    }

    pub fn item(mut self, item: ItemTemplate, equipped: bool) -> Self {
        self.template.starting_items.push(StartingItem { item, equipped });
        self
    }

    pub fn on_hit(mut self, effect: OnHitEffect) -> Self {
        self.template.on_hit.push(effect);
        self
    }

    pub fn xp_given(mut self, xp: u32) -> Self {
        self.template.xp_given = xp;
        self
    }

    pub fn on_death(mut self, trigger: DeathTrigger) -> Self {
        self.template.on_death = Some(trigger);
        self
    }

    pub fn build(self) -> ActorTemplate {
        self.template
    }
}

/// Read-only lookup of templates by content key (e.g. `"orc"`, `"bow"`).
pub trait CatalogOracle {
    fn actor(&self, key: &str) -> Option<&ActorTemplate>;

    fn item(&self, key: &str) -> Option<&ItemTemplate>;
}
