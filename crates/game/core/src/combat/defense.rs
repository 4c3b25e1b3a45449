//! Defensive resolution: active defenses, then armor.
//!
//! Either check fully negates an attack when it succeeds.

use super::narration::capitalize;
use super::{CombatEnv, improvement_check};
use crate::action::Action;
use crate::state::{Combatant, EffectKind, WearSlot, skills};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DefenseKind {
    Dodge,
    Parry,
    Evasion,
}

impl DefenseKind {
    /// Checked in this order.
    pub const ORDER: [DefenseKind; 3] = [Self::Dodge, Self::Parry, Self::Evasion];

    pub fn skill(self) -> &'static str {
        match self {
            Self::Dodge => skills::DODGE,
            Self::Parry => skills::PARRY,
            Self::Evasion => skills::EVASIVE_MANEUVERS,
        }
    }

    fn applies(self, defender: &Combatant, action: &Action) -> bool {
        match self {
            Self::Dodge => action.damage_type.is_physical(),
            Self::Parry => action.damage_type.is_physical() && defender.wielded().is_some(),
            Self::Evasion => action.damage_type.is_evadable(),
        }
    }

    fn verbs(self) -> (&'static str, &'static str) {
        match self {
            Self::Dodge => ("dodge", "dodges"),
            Self::Parry => ("parry", "parries"),
            Self::Evasion => ("evade", "evades"),
        }
    }
}

/// Armor that stopped a hit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Absorption {
    /// Worn piece that took the wear, if any piece qualified.
    pub slot: Option<WearSlot>,
    /// True when the piece broke and was removed.
    pub destroyed: bool,
}

/// Rolls dodge, parry and evasive maneuvers in order.
///
/// Each applicable, trained defense rolls d100 against the defender's
/// proficiency (clamped to 1..=10 while blinded or disoriented) and runs its
/// improvement check whatever the outcome.
pub fn check_active_defense(
    defender: &mut Combatant,
    attacker: &Combatant,
    action: &Action,
    env: &mut CombatEnv<'_>,
) -> Option<DefenseKind> {
    for kind in DefenseKind::ORDER {
        if !kind.applies(defender, action) {
            continue;
        }
        let mut percent = defender.proficiency(kind.skill());
        if percent == 0 {
            continue;
        }
        if defender.is_impaired() {
            percent = percent.clamp(1, 10);
        }
        let success = env.rng.roll_d100() < u32::from(percent);
        improvement_check(defender, kind.skill(), success, env);
        if success {
            let (verb, verbs) = kind.verbs();
            env.outbox
                .tell(defender, format!("You {verb} {}'s attack.", attacker.name));
            env.outbox.tell(
                attacker,
                format!("{} {verbs} your attack.", capitalize(&defender.name)),
            );
            env.outbox.room(
                defender.location,
                &[attacker.id, defender.id],
                format!(
                    "{} {verbs} {}'s attack.",
                    capitalize(&defender.name),
                    attacker.name
                ),
            );
            return Some(kind);
        }
    }
    None
}

/// Rolls the defender's armor against the action's damage category.
///
/// The chance is the summed absorption of matching worn pieces plus active
/// protection. A block wears one random matching piece down by a point of
/// durability and removes it once broken.
pub fn check_armor_absorption(
    defender: &mut Combatant,
    attacker: &Combatant,
    action: &Action,
    env: &mut CombatEnv<'_>,
) -> Option<Absorption> {
    let category = action.damage_type.armor_category();
    let total = defender.equipment.absorption(category)
        + defender.effects.magnitude(EffectKind::Protection);
    if total == 0 {
        return None;
    }
    if env.rng.roll_d100() >= total {
        return None;
    }

    let candidates = defender.equipment.absorbing_slots(category);
    let mut absorption = Absorption {
        slot: None,
        destroyed: false,
    };
    if !candidates.is_empty() {
        let slot = candidates[env.rng.pick(candidates.len())];
        absorption.slot = Some(slot);
        let broke = defender
            .equipment
            .get_mut(slot)
            .and_then(|item| item.durability_mut())
            .is_some_and(|durability| durability.degrade());
        if broke {
            if let Some(item) = defender.equipment.unequip(slot) {
                env.outbox
                    .tell(defender, format!("{} falls apart!", capitalize(&item.name)));
            }
            absorption.destroyed = true;
        }
    }

    env.outbox.tell(
        defender,
        format!("Your armor absorbs {}'s {}.", attacker.name, action.noun),
    );
    env.outbox.tell(
        attacker,
        format!("{}'s armor absorbs your {}.", capitalize(&defender.name), action.noun),
    );
    Some(absorption)
}
