use crate::state::Combatant;

/// Decides whether `attacker` may attack `target` at all.
pub trait PvpPolicy: Send + Sync {
    fn permits(&self, attacker: &Combatant, target: &Combatant) -> bool;
}

/// Players may only attack players within `max_gap` levels of their own.
///
/// Fights involving an NPC on either side are always permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelRange {
    pub max_gap: u32,
}

impl LevelRange {
    pub fn new(max_gap: u32) -> Self {
        Self { max_gap }
    }

    pub fn unrestricted() -> Self {
        Self { max_gap: u32::MAX }
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self::new(5)
    }
}

impl PvpPolicy for LevelRange {
    fn permits(&self, attacker: &Combatant, target: &Combatant) -> bool {
        if attacker.is_npc() || target.is_npc() {
            return true;
        }
        attacker.level.abs_diff(target.level) <= self.max_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EntityId;

    #[test]
    fn level_gap_only_limits_player_pairs() {
        let policy = LevelRange::new(5);
        let low = Combatant::player(EntityId(1), "Ada", 10);
        let high = Combatant::player(EntityId(2), "Bryn", 16);
        let rat = Combatant::npc(EntityId(3), "rat", 40);

        assert!(!policy.permits(&low, &high));
        assert!(policy.permits(&low, &rat));
        assert!(policy.permits(&rat, &high));
        assert!(LevelRange::unrestricted().permits(&low, &high));
    }
}
