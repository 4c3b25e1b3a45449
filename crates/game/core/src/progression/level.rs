use crate::combat::{Outbox, SoundCue};
use crate::config::CombatConfig;
use crate::state::Combatant;

/// Levels gained in one advancement check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelAdvance {
    pub from: u32,
    pub to: u32,
    pub health_gain: u32,
    pub mana_gain: u32,
    pub movement_gain: u32,
}

/// Adds experience to a player and runs the advancement check.
pub fn grant_experience(
    recipient: &mut Combatant,
    amount: u64,
    config: &CombatConfig,
    outbox: &mut Outbox,
) -> Option<LevelAdvance> {
    if !recipient.is_player() {
        return None;
    }
    recipient.experience = recipient.experience.saturating_add(amount);
    if amount > 0 {
        outbox.tell(recipient, format!("You receive {amount} experience points."));
    }
    advance_levels(recipient, config, outbox)
}

/// Raises the combatant through every level its experience covers.
///
/// Each level adds the configured vital maxima; health is refilled once at
/// the end.
pub fn advance_levels(
    combatant: &mut Combatant,
    config: &CombatConfig,
    outbox: &mut Outbox,
) -> Option<LevelAdvance> {
    let levels = &config.levels;
    let from = combatant.level;
    while combatant.level < levels.max_level
        && combatant.experience >= levels.threshold(combatant.level)
    {
        combatant.level += 1;
        combatant.vitals.health.raise_max(levels.health_gain);
        combatant.vitals.mana.raise_max(levels.mana_gain);
        combatant.vitals.movement.raise_max(levels.movement_gain);
    }
    if combatant.level == from {
        return None;
    }

    let gained = combatant.level - from;
    combatant.vitals.health.refill();
    outbox.tell(
        combatant,
        format!("You raise a level! You are now level {}.", combatant.level),
    );
    outbox.sound(combatant, SoundCue::LevelUp);
    Some(LevelAdvance {
        from,
        to: combatant.level,
        health_gain: gained * levels.health_gain,
        mana_gain: gained * levels.mana_gain,
        movement_gain: gained * levels.movement_gain,
    })
}

/// Experience still needed to leave the current level.
pub fn experience_to_next(combatant: &Combatant, config: &CombatConfig) -> u64 {
    config
        .levels
        .threshold(combatant.level)
        .saturating_sub(combatant.experience)
}
