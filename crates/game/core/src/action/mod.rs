//! Actions: skills, spells and innate weapon attacks.
//!
//! An [`Action`] is plain data (dice, damage type, cost) paired with a hook
//! strategy implementing [`ActionHooks`]. Concrete skills and spells differ in
//! their data and in which [`StandardHooks`] variant they carry, so adding a
//! new one is a catalog entry rather than a new type.
mod hooks;

use std::fmt;
use std::sync::Arc;

pub use hooks::{ActionFailure, ActionHooks, HookContext, HookSpec, StandardHooks};

use crate::env::RngOracle;
use crate::state::{ArmorCategory, Combatant};

/// Damage categories. Each maps onto exactly one armor category.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    Slash,
    Pierce,
    Blunt,
    Energy,
    Lightning,
    Afflictive,
    Maledictive,
    Negative,
}

impl DamageType {
    /// Slash, pierce and blunt; the only types dodge and parry apply to.
    pub fn is_physical(self) -> bool {
        matches!(self, Self::Slash | Self::Pierce | Self::Blunt)
    }

    /// Types evasive maneuvers can avoid.
    pub fn is_evadable(self) -> bool {
        self.is_physical() || matches!(self, Self::Lightning | Self::Energy)
    }

    pub fn armor_category(self) -> ArmorCategory {
        match self {
            Self::Slash => ArmorCategory::Slash,
            Self::Pierce => ArmorCategory::Pierce,
            Self::Blunt => ArmorCategory::Blunt,
            _ => ArmorCategory::Magic,
        }
    }
}

/// `count` dice of `faces` sides each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dice {
    pub count: u32,
    pub faces: u32,
}

impl Dice {
    pub const fn new(count: u32, faces: u32) -> Self {
        Self { count, faces }
    }

    /// Highest possible roll.
    pub fn max(&self) -> u32 {
        self.count.saturating_mul(self.faces)
    }

    pub fn roll(&self, rng: &mut dyn RngOracle) -> u32 {
        if self.faces == 0 {
            return 0;
        }
        (0..self.count).map(|_| rng.roll_die(self.faces)).sum()
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Skill,
    Spell,
    /// The attacker's weapon or bare hands.
    Innate,
}

/// A resolved action ready to be performed.
#[derive(Clone)]
pub struct Action {
    pub name: String,
    pub kind: ActionKind,
    pub dice: Dice,
    pub damage_type: DamageType,
    pub damage_modifier: f64,
    pub mana_cost: u32,
    /// Player-invoked actions use their `is_success` hook; automatic ones roll
    /// against proficiency.
    pub invokable: bool,
    /// Display noun used in hit messages.
    pub noun: String,
    /// Proficiency key governing success; defaults to the action name.
    pub skill: Option<String>,
    hooks: Arc<dyn ActionHooks>,
}

impl Action {
    pub fn new(name: impl Into<String>, kind: ActionKind, damage_type: DamageType) -> Self {
        let name = name.into();
        Self {
            noun: name.clone(),
            name,
            kind,
            dice: Dice::new(1, 4),
            damage_type,
            damage_modifier: 1.0,
            mana_cost: 0,
            invokable: kind == ActionKind::Spell,
            skill: None,
            hooks: Arc::new(StandardHooks::plain()),
        }
    }

    /// The attacker's basic attack with whatever they are wielding.
    pub fn weapon_attack(attacker: &Combatant) -> Self {
        let profile = attacker.weapon_profile();
        Self {
            name: profile.noun.clone(),
            kind: ActionKind::Innate,
            dice: Dice::new(attacker.hit_dice, attacker.damage_dice),
            damage_type: profile.damage_type,
            damage_modifier: 1.0,
            mana_cost: 0,
            invokable: false,
            noun: profile.noun,
            skill: Some(profile.skill),
            hooks: Arc::new(StandardHooks::plain()),
        }
    }

    #[must_use]
    pub fn with_dice(mut self, count: u32, faces: u32) -> Self {
        self.dice = Dice::new(count, faces);
        self
    }

    #[must_use]
    pub fn with_noun(mut self, noun: impl Into<String>) -> Self {
        self.noun = noun.into();
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: f64) -> Self {
        self.damage_modifier = modifier;
        self
    }

    #[must_use]
    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    #[must_use]
    pub fn with_invokable(mut self, invokable: bool) -> Self {
        self.invokable = invokable;
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn ActionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn is_spell(&self) -> bool {
        self.kind == ActionKind::Spell
    }

    /// Proficiency key consulted for success and improvement.
    pub fn skill_key(&self) -> &str {
        self.skill.as_deref().unwrap_or(&self.name)
    }

    pub fn hooks(&self) -> &dyn ActionHooks {
        self.hooks.as_ref()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("dice", &self.dice)
            .field("damage_type", &self.damage_type)
            .field("damage_modifier", &self.damage_modifier)
            .field("mana_cost", &self.mana_cost)
            .field("invokable", &self.invokable)
            .field("skill", &self.skill_key())
            .field("hooks", &self.hooks)
            .finish()
    }
}
