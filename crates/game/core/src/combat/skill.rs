//! Proficiency checks and skill improvement.

use super::CombatEnv;
use crate::config::CombatConfig;
use crate::state::Combatant;

/// Proficiency used for offensive checks.
///
/// NPCs without an explicit record fight at the configured default; players
/// without one are untrained.
pub fn effective_proficiency(combatant: &Combatant, skill: &str, config: &CombatConfig) -> u8 {
    match combatant.proficiencies.get(skill) {
        Some(p) => p.percent,
        None if combatant.is_npc() => config.npc_default_proficiency,
        None => 0,
    }
}

/// Rolls d100 against the combatant's proficiency and runs the improvement
/// check on the outcome. Zero proficiency fails without a roll.
pub fn check_proficiency(combatant: &mut Combatant, skill: &str, env: &mut CombatEnv<'_>) -> bool {
    let percent = effective_proficiency(combatant, skill, env.config);
    if percent == 0 {
        return false;
    }
    let success = env.rng.roll_d100() < u32::from(percent);
    improvement_check(combatant, skill, success, env);
    success
}

/// Gives a player a chance to improve a trained, unmastered skill.
///
/// Failure teaches more than success. Returns true when the skill improved.
pub fn improvement_check(
    combatant: &mut Combatant,
    skill: &str,
    success: bool,
    env: &mut CombatEnv<'_>,
) -> bool {
    if !combatant.is_player() {
        return false;
    }
    let chance = if success {
        env.config.improve_on_success
    } else {
        env.config.improve_on_failure
    };
    let Some(record) = combatant.proficiency_mut(skill) else {
        return false;
    };
    if record.is_mastered() {
        return false;
    }
    if !env.rng.chance(u32::from(chance)) {
        record.progress = record.progress.saturating_add(1);
        return false;
    }
    record.percent += 1;
    record.progress = 0;
    let percent = record.percent;
    env.outbox.tell(
        combatant,
        format!("You feel your skill in {skill} improving. ({percent}%)"),
    );
    true
}
