//! Combatant state shared by player characters and NPCs.
//!
//! Players and NPCs are a single [`Combatant`] type distinguished by
//! [`CombatantKind`]. Capabilities that differ between the two (default
//! proficiencies, experience gain, death penalties) branch on the kind rather
//! than on separate type hierarchies.

use std::collections::BTreeMap;

use bitflags::bitflags;

use super::effects::{ActiveEffect, ActiveEffects, EffectKind};
use super::equipment::Equipment;
use super::item::{Item, WeaponProfile};
use super::proficiency::{Proficiency, skills};
use super::{EntityId, RoomId};
use crate::action::DamageType;

/// Discriminates player characters from NPCs (mobiles).
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatantKind {
    #[default]
    Player,
    Npc,
}

/// A `(current, max)` resource pair.
///
/// `current` is signed so that lethal damage can drive it below zero while a
/// death is being detected. Observers read it through [`Vital::current`],
/// which is clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vital {
    current: i32,
    max: i32,
}

impl Vital {
    /// Creates a full pool.
    pub fn full(max: u32) -> Self {
        let max = max.min(i32::MAX as u32) as i32;
        Self { current: max, max }
    }

    pub fn new(current: i32, max: u32) -> Self {
        let max = max.min(i32::MAX as u32) as i32;
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Current value clamped to `[0, max]`.
    pub fn current(&self) -> u32 {
        self.current.clamp(0, self.max.max(0)) as u32
    }

    /// Unclamped value, negative while a death is pending.
    pub fn raw(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max.max(0) as u32
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Subtracts `amount`, allowing the value to fall below zero.
    pub fn reduce(&mut self, amount: u32) -> i32 {
        let amount = amount.min(i32::MAX as u32) as i32;
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    /// Spends `amount` if available; returns `false` without spending otherwise.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.current() < amount {
            return false;
        }
        self.reduce(amount);
        true
    }

    pub fn restore(&mut self, amount: u32) {
        let amount = amount.min(i32::MAX as u32) as i32;
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn set(&mut self, value: i32) {
        self.current = value.min(self.max);
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn raise_max(&mut self, amount: u32) {
        let amount = amount.min(i32::MAX as u32) as i32;
        self.max = self.max.saturating_add(amount);
    }

    /// Current value as a percentage of the maximum (0 when max is 0).
    pub fn percent(&self) -> u32 {
        if self.max <= 0 {
            return 0;
        }
        let percent = u64::from(self.current()) * 100 / u64::from(self.max());
        u32::try_from(percent).unwrap_or(u32::MAX)
    }
}

/// Health, mana and movement pools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub health: Vital,
    pub mana: Vital,
    pub movement: Vital,
}

impl Vitals {
    pub fn full(health: u32, mana: u32, movement: u32) -> Self {
        Self {
            health: Vital::full(health),
            mana: Vital::full(mana),
            movement: Vital::full(movement),
        }
    }
}

bitflags! {
    /// Boolean combat state and player preferences.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatFlags: u8 {
        /// Currently engaged in combat.
        const FIGHTING = 1 << 0;
        /// Recently died; cannot fight until the ghost effect wears off.
        const GHOST = 1 << 1;
        /// Automatically loot NPC corpses this combatant kills.
        const AUTOLOOT = 1 << 2;
        /// Automatically sacrifice NPC corpses this combatant kills.
        const AUTOSAC = 1 << 3;
    }
}

/// Moral alignment; opposed alignments amplify kill experience.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Alignment {
    Good,
    #[default]
    Neutral,
    Evil,
}

impl Alignment {
    pub fn is_opposed_to(self, other: Alignment) -> bool {
        matches!(
            (self, other),
            (Alignment::Good, Alignment::Evil) | (Alignment::Evil, Alignment::Good)
        )
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Race {
    #[default]
    Human,
    Elf,
    Dwarf,
    Halfling,
    Orc,
    Goblin,
    Troll,
    Beast,
    Undead,
}

/// Primary attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 13,
            dexterity: 13,
            constitution: 13,
            intelligence: 13,
            wisdom: 13,
            charisma: 13,
        }
    }
}

/// Saving-throw resistance scores (percent) per damage category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resistances {
    /// Generic spell resistance, used for categories without a dedicated score.
    pub spell: u8,
    /// Negative and energy damage.
    pub negative: u8,
    pub afflictive: u8,
    pub maledictive: u8,
}

impl Resistances {
    /// Resistance score that applies to a damage type.
    pub fn against(&self, damage_type: DamageType) -> u8 {
        match damage_type {
            DamageType::Negative | DamageType::Energy => self.negative,
            DamageType::Afflictive => self.afflictive,
            DamageType::Maledictive => self.maledictive,
            _ => self.spell,
        }
    }
}

/// Kill and death counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KillMetrics {
    pub npc_kills: u32,
    pub pvp_kills: u32,
    pub deaths: u32,
    pub pvp_deaths: u32,
}

/// A participant in combat, either a player character or an NPC.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub kind: CombatantKind,
    pub level: u32,
    pub vitals: Vitals,
    pub flags: CombatFlags,
    /// Current opponent, if any.
    pub fighting: Option<EntityId>,
    pub proficiencies: BTreeMap<String, Proficiency>,
    pub equipment: Equipment,
    pub inventory: Vec<Item>,
    pub gold: u64,
    pub alignment: Alignment,
    pub race: Race,
    pub attributes: Attributes,
    pub resistances: Resistances,
    /// Innate number of damage dice rolled by non-spell attacks.
    pub hit_dice: u32,
    /// Innate faces per damage die for non-spell attacks.
    pub damage_dice: u32,
    pub effects: ActiveEffects,
    pub location: RoomId,
    /// Where the combatant respawns after death.
    pub home: RoomId,
    pub experience: u64,
    pub metrics: KillMetrics,
}

impl Combatant {
    /// Creates a combatant with default stats for its level.
    pub fn new(id: EntityId, name: impl Into<String>, kind: CombatantKind, level: u32) -> Self {
        let level = level.max(1);
        Self {
            id,
            name: name.into(),
            kind,
            level,
            vitals: Vitals::full(20 + level * 10, 100, 100),
            flags: CombatFlags::empty(),
            fighting: None,
            proficiencies: BTreeMap::new(),
            equipment: Equipment::empty(),
            inventory: Vec::new(),
            gold: 0,
            alignment: Alignment::Neutral,
            race: Race::Human,
            attributes: Attributes::default(),
            resistances: Resistances::default(),
            hit_dice: 1,
            damage_dice: 4,
            effects: ActiveEffects::empty(),
            location: RoomId::default(),
            home: RoomId::default(),
            experience: 0,
            metrics: KillMetrics::default(),
        }
    }

    pub fn player(id: EntityId, name: impl Into<String>, level: u32) -> Self {
        Self::new(id, name, CombatantKind::Player, level)
    }

    pub fn npc(id: EntityId, name: impl Into<String>, level: u32) -> Self {
        Self::new(id, name, CombatantKind::Npc, level)
    }

    // ===== builder helpers =====

    #[must_use]
    pub fn with_health(mut self, current: i32, max: u32) -> Self {
        self.vitals.health = Vital::new(current, max);
        self
    }

    #[must_use]
    pub fn with_mana(mut self, current: i32, max: u32) -> Self {
        self.vitals.mana = Vital::new(current, max);
        self
    }

    #[must_use]
    pub fn with_location(mut self, room: RoomId) -> Self {
        self.location = room;
        self
    }

    #[must_use]
    pub fn with_home(mut self, room: RoomId) -> Self {
        self.home = room;
        self
    }

    #[must_use]
    pub fn with_proficiency(mut self, skill: impl Into<String>, percent: u8) -> Self {
        self.set_proficiency(skill, percent);
        self
    }

    #[must_use]
    pub fn with_dice(mut self, hit_dice: u32, damage_dice: u32) -> Self {
        self.hit_dice = hit_dice;
        self.damage_dice = damage_dice;
        self
    }

    #[must_use]
    pub fn with_gold(mut self, gold: u64) -> Self {
        self.gold = gold;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CombatFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.inventory.push(item);
        self
    }

    /// Equips an item in its natural slot, ignoring items without one.
    #[must_use]
    pub fn with_equipped(mut self, item: Item) -> Self {
        if let Some(slot) = item.wear_slot() {
            self.equipment.equip(slot, item);
        }
        self
    }

    // ===== queries =====

    pub fn is_npc(&self) -> bool {
        self.kind == CombatantKind::Npc
    }

    pub fn is_player(&self) -> bool {
        self.kind == CombatantKind::Player
    }

    pub fn is_alive(&self) -> bool {
        !self.vitals.health.is_depleted()
    }

    pub fn is_fighting(&self) -> bool {
        self.flags.contains(CombatFlags::FIGHTING)
    }

    pub fn is_ghost(&self) -> bool {
        self.flags.contains(CombatFlags::GHOST)
    }

    /// Proficiency percentage in a skill, 0 when untrained.
    pub fn proficiency(&self, skill: &str) -> u8 {
        self.proficiencies
            .get(skill)
            .map(|p| p.percent)
            .unwrap_or(0)
    }

    pub fn proficiency_mut(&mut self, skill: &str) -> Option<&mut Proficiency> {
        self.proficiencies.get_mut(skill)
    }

    pub fn set_proficiency(&mut self, skill: impl Into<String>, percent: u8) {
        self.proficiencies
            .insert(skill.into(), Proficiency::new(percent));
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.has(kind)
    }

    pub fn add_effect(&mut self, effect: ActiveEffect) {
        self.effects.apply(effect);
    }

    /// True while blinded or disoriented, which cripples active defense.
    pub fn is_impaired(&self) -> bool {
        self.has_effect(EffectKind::Blinded) || self.has_effect(EffectKind::Disoriented)
    }

    pub fn wielded(&self) -> Option<&Item> {
        self.equipment.wielded()
    }

    /// Profile of the wielded weapon, or bare hands.
    pub fn weapon_profile(&self) -> WeaponProfile {
        self.wielded()
            .and_then(|item| item.weapon_profile().cloned())
            .unwrap_or_else(|| WeaponProfile {
                skill: skills::HAND_TO_HAND.to_owned(),
                noun: "punch".to_owned(),
                damage_type: DamageType::Blunt,
            })
    }

    // ===== fighting relation =====

    /// Marks this combatant as fighting `target`.
    pub fn start_fighting(&mut self, target: EntityId) {
        self.flags.insert(CombatFlags::FIGHTING);
        self.fighting = Some(target);
    }

    /// Clears the fighting flag and target.
    pub fn stop_fighting(&mut self) {
        self.flags.remove(CombatFlags::FIGHTING);
        self.fighting = None;
    }

    /// Total currency value of coins carried as items plus loose gold.
    pub fn wealth(&self) -> u64 {
        self.gold
            + self
                .inventory
                .iter()
                .map(Item::coin_value)
                .sum::<u64>()
    }
}
