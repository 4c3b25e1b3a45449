use crate::config::CombatConfig;
use crate::state::Combatant;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AwardKind {
    /// NPC kill milestones.
    Slayer,
    /// Player kill milestones.
    Duelist,
}

/// A kill milestone reached by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Award {
    pub kind: AwardKind,
    /// 1-based position of the threshold in its table.
    pub tier: u8,
    pub threshold: u32,
}

/// Bumps the kill counters and returns the milestone reached, if any.
///
/// Only player killers keep counts. A PvP kill also counts a PvP death for
/// the victim.
pub fn record_kill(
    killer: &mut Combatant,
    victim: &mut Combatant,
    config: &CombatConfig,
) -> Option<Award> {
    if !killer.is_player() {
        return None;
    }
    let (kind, count, table) = if victim.is_npc() {
        killer.metrics.npc_kills += 1;
        (
            AwardKind::Slayer,
            killer.metrics.npc_kills,
            &config.npc_kill_awards,
        )
    } else {
        killer.metrics.pvp_kills += 1;
        victim.metrics.pvp_deaths += 1;
        (
            AwardKind::Duelist,
            killer.metrics.pvp_kills,
            &config.pvp_kill_awards,
        )
    };

    table
        .iter()
        .position(|threshold| *threshold == count)
        .map(|index| Award {
            kind,
            tier: (index + 1).min(u8::MAX as usize) as u8,
            threshold: count,
        })
}
