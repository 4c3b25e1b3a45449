//! Combat resolution.
//!
//! Synchronous decision functions for a single attack attempt. They mutate
//! only the two combatants they are handed, draw randomness from the
//! environment's [`RngOracle`](crate::env::RngOracle) and record every
//! player-visible line in an [`Outbox`].
//!
//! # Core Functions
//!
//! - `calculate_damage`: dice, level adjustment, ward and saving throw
//! - `check_active_defense`: dodge, parry, evasive maneuvers
//! - `check_armor_absorption`: armor roll with durability wear
//! - `resolve_attack`: the full attempt, accuracy through lethal check

pub mod attack;
pub mod damage;
pub mod defense;
pub mod narration;
pub mod outbox;
pub mod skill;

pub use attack::{AttackOutcome, AttackReport, resolve_attack, untrained_swing};
pub use damage::{calculate_damage, saving_throw};
pub use defense::{Absorption, DefenseKind, check_active_defense, check_armor_absorption};
pub use narration::{capitalize, damage_verb, health_condition};
pub use outbox::{Message, Outbox, SoundCue};
pub use skill::{check_proficiency, effective_proficiency, improvement_check};

use crate::config::CombatConfig;
use crate::env::{PvpPolicy, RngOracle};

/// Everything a combat decision needs besides the combatants themselves.
pub struct CombatEnv<'a> {
    pub rng: &'a mut dyn RngOracle,
    pub config: &'a CombatConfig,
    pub pvp: &'a dyn PvpPolicy,
    pub outbox: &'a mut Outbox,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        rng: &'a mut dyn RngOracle,
        config: &'a CombatConfig,
        pvp: &'a dyn PvpPolicy,
        outbox: &'a mut Outbox,
    ) -> Self {
        Self {
            rng,
            config,
            pvp,
            outbox,
        }
    }
}
