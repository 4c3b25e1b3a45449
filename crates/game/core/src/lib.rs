//! Deterministic combat rules shared by the runtime and offline tools.
//!
//! `combat-core` defines the canonical combat data model (combatants, items,
//! actions, groups, corpses) and exposes pure, synchronous decision functions:
//! damage calculation, defensive resolution, single-attack resolution, corpse
//! construction, death penalties, kill awards and experience. Randomness is
//! drawn exclusively from an injected [`RngOracle`] and every player-visible
//! line is written into an [`Outbox`] that the runtime delivers asynchronously.
pub mod action;
pub mod combat;
pub mod config;
pub mod death;
pub mod env;
pub mod error;
pub mod pricing;
pub mod progression;
pub mod state;

pub use action::{
    Action, ActionFailure, ActionHooks, ActionKind, DamageType, Dice, HookContext, HookSpec,
    StandardHooks,
};
pub use combat::{
    Absorption, AttackOutcome, AttackReport, CombatEnv, DefenseKind, Message, Outbox, SoundCue,
    calculate_damage, capitalize, check_active_defense, check_armor_absorption, damage_verb,
    health_condition, resolve_attack, saving_throw, untrained_swing,
};
pub use config::{CombatConfig, ExperienceTable, LevelTable};
pub use death::{Award, AwardKind, CorpseBuild, LootOutcome};
pub use env::{
    ActionRegistry, CombatantRegistry, GroupRegistry, LevelRange, PcgRng, PvpPolicy, RngOracle,
    RoomRegistry, ScriptedRng,
};
pub use error::{ErrorSeverity, GameError};
pub use progression::{ExperienceGain, LevelAdvance};
pub use state::{
    ActiveEffect, ActiveEffects, Alignment, ArmorCategory, ArmorRating, Attributes,
    CombatFlags, Combatant, CombatantKind, Corpse, CorpseKind, Durability, EffectKind,
    EntityId, Equipment, Group, GroupBook, GroupError, GroupId, Item, ItemKind, KillMetrics,
    Proficiency, Race, Resistances, RoomError, RoomId, Tick, Vital, Vitals, WearSlot,
    WeaponProfile, skills,
};
