//! Combat data model.
//!
//! Combatants own their items outright; corpses receive deep copies. Group
//! membership lives in the group registry rather than on the combatant so
//! there is a single source of truth for who is grouped with whom.
mod combatant;
mod common;
mod corpse;
mod effects;
mod equipment;
mod group;
mod item;
mod proficiency;

pub use combatant::{
    Alignment, Attributes, CombatFlags, Combatant, CombatantKind, KillMetrics, Race, Resistances,
    Vital, Vitals,
};
pub use common::{EntityId, RoomId, Tick};
pub use corpse::{Corpse, CorpseKind, RoomError};
pub use effects::{ActiveEffect, ActiveEffects, EffectKind};
pub use equipment::Equipment;
pub use group::{Group, GroupBook, GroupError, GroupId};
pub use item::{ArmorCategory, ArmorRating, Durability, Item, ItemKind, WeaponProfile, WearSlot};
pub use proficiency::{Proficiency, skills};
