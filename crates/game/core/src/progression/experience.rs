//! Kill experience.
//!
//! ```text
//! diff     = victim.level - killer.level
//! base     = base_per_level * victim.level * (1 + growth)^(victim.level - 1)
//! scaled   = base * e^(decay * diff)
//! awarded  = min(scaled * alignment, random max in [max_low, max_high])
//! ```
//!
//! Outside the level window (killer more than `gap_below` levels above, or
//! victim more than `gap_above` levels above) only the flat reward is given,
//! and NPC victims give nothing.

use super::LevelAdvance;
use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::state::{Alignment, Combatant, EntityId};

/// Experience delivered to one recipient of a kill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperienceGain {
    pub recipient: EntityId,
    pub amount: u64,
    /// Group-size multiplier that was applied (1.0 when solo).
    pub modifier: f64,
    pub advance: Option<LevelAdvance>,
}

/// Experience `killer` earns for `victim`, before any group modifier.
///
/// Always draws the randomized maximum first so the RNG stream does not
/// depend on the level window.
pub fn kill_experience(
    killer: &Combatant,
    victim: &Combatant,
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> u64 {
    let table = &config.experience;
    let low = table.max_low.min(i32::MAX as u32 - 1) as i32;
    let high = table.max_high.max(table.max_low).min(i32::MAX as u32 - 1) as i32;
    let cap = f64::from(rng.range(low, high + 1));

    let diff = i64::from(victim.level) - i64::from(killer.level);
    if diff < -i64::from(table.gap_below) || diff > i64::from(table.gap_above) {
        return if victim.is_npc() { 0 } else { table.flat_reward };
    }

    let level = f64::from(victim.level.max(1));
    let base = table.base_per_level * level * (1.0 + table.growth).powf(level - 1.0);
    let scaled = base * (table.decay * diff as f64).exp();

    let alignment = if killer.alignment.is_opposed_to(victim.alignment) {
        table.opposed_multiplier
    } else if killer.alignment == victim.alignment && killer.alignment != Alignment::Neutral {
        table.matching_multiplier
    } else {
        1.0
    };

    (scaled * alignment).min(cap).round().max(1.0) as u64
}

/// One member's share after the group-size modifier.
pub fn group_share(amount: u64, group_size: usize, config: &CombatConfig) -> u64 {
    (amount as f64 * config.group_modifier(group_size)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    fn xp(killer: &Combatant, victim: &Combatant) -> u64 {
        kill_experience(
            killer,
            victim,
            &mut ScriptedRng::constant(1500),
            &CombatConfig::default(),
        )
    }

    #[test]
    fn outranking_killer_still_earns_inside_window() {
        let killer = Combatant::player(EntityId(1), "Ada", 20);
        let victim = Combatant::npc(EntityId(2), "the goblin", 10);
        let gained = xp(&killer, &victim);
        assert!((130..=145).contains(&gained), "gained {gained}");
    }

    #[test]
    fn outside_window_gives_flat_reward_or_nothing() {
        let killer = Combatant::player(EntityId(1), "Ada", 21);
        let npc = Combatant::npc(EntityId(2), "the goblin", 10);
        let player = Combatant::player(EntityId(3), "Bryn", 10);
        assert_eq!(xp(&killer, &npc), 0);
        assert_eq!(xp(&killer, &player), 1);

        let novice = Combatant::player(EntityId(4), "Cade", 3);
        let giant = Combatant::npc(EntityId(5), "the giant", 10);
        assert_eq!(xp(&novice, &giant), 0);
    }

    #[test]
    fn tougher_victims_are_worth_more_up_to_the_cap() {
        let killer = Combatant::player(EntityId(1), "Ada", 10);
        let even = xp(&killer, &Combatant::npc(EntityId(2), "a", 10));
        let above = xp(&killer, &Combatant::npc(EntityId(3), "b", 13));
        let capped = xp(&killer, &Combatant::npc(EntityId(4), "c", 16));
        assert!(above > even);
        assert_eq!(capped, 1500);
    }

    #[test]
    fn alignment_scales_experience() {
        let victim = Combatant::npc(EntityId(2), "the paladin", 10).with_alignment(Alignment::Good);
        let evil = Combatant::player(EntityId(1), "Ada", 10).with_alignment(Alignment::Evil);
        let neutral = Combatant::player(EntityId(1), "Ada", 10);
        let good = Combatant::player(EntityId(1), "Ada", 10).with_alignment(Alignment::Good);

        let opposed = xp(&evil, &victim);
        let plain = xp(&neutral, &victim);
        let matching = xp(&good, &victim);
        assert!(opposed > plain);
        assert!(plain > matching);
    }

    #[test]
    fn group_sizes_order_as_tabled() {
        let config = CombatConfig::default();
        let solo = group_share(400, 1, &config);
        let three = group_share(400, 3, &config);
        let six = group_share(400, 6, &config);
        assert_eq!(solo, 400);
        assert_eq!(group_share(400, 2, &config), 340);
        assert!(three > solo);
        assert!(six < three);
    }
}
