//! Tunable combat constants.
//!
//! Every number the rules consult lives in [`CombatConfig`]. The defaults are
//! the live game's tables; content packs override them from TOML.

/// Experience curve parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExperienceTable {
    /// Experience per victim level before growth is applied.
    pub base_per_level: f64,
    /// Compounding growth per victim level above 1.
    pub growth: f64,
    /// Exponential rate applied to the level difference (victim - killer).
    pub decay: f64,
    /// Bounds of the randomized per-kill maximum, inclusive.
    pub max_low: u32,
    pub max_high: u32,
    /// Killers more than this many levels above the victim get the flat reward.
    pub gap_below: u32,
    /// Victims more than this many levels above the killer give the flat reward.
    pub gap_above: u32,
    /// Reward outside the level window; NPC victims give nothing.
    pub flat_reward: u64,
    pub opposed_multiplier: f64,
    pub matching_multiplier: f64,
}

impl Default for ExperienceTable {
    fn default() -> Self {
        Self {
            base_per_level: 40.0,
            growth: 0.05,
            decay: 0.15,
            max_low: 1400,
            max_high: 1600,
            gap_below: 10,
            gap_above: 6,
            flat_reward: 1,
            opposed_multiplier: 1.25,
            matching_multiplier: 0.75,
        }
    }
}

/// Level advancement parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LevelTable {
    /// Experience needed to leave level `n` is `threshold_base * n * n`.
    pub threshold_base: u64,
    pub max_level: u32,
    pub health_gain: u32,
    pub mana_gain: u32,
    pub movement_gain: u32,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            threshold_base: 1000,
            max_level: 50,
            health_gain: 10,
            mana_gain: 5,
            movement_gain: 5,
        }
    }
}

impl LevelTable {
    /// Total experience required to advance past `level`.
    pub fn threshold(&self, level: u32) -> u64 {
        let level = u64::from(level);
        self.threshold_base.saturating_mul(level.saturating_mul(level))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatConfig {
    /// Weapon proficiency assumed for NPCs without an explicit record.
    pub npc_default_proficiency: u8,
    /// Players below this weapon proficiency swing harmlessly.
    pub min_weapon_proficiency: u8,
    /// Percent chance the scheduler flags an attack attempt critical.
    pub critical_chance: u8,
    /// Percent chance an untrained swing produces a training hint.
    pub hint_chance: u8,
    pub improve_on_success: u8,
    pub improve_on_failure: u8,
    pub experience: ExperienceTable,
    pub levels: LevelTable,
    /// Group-size multipliers indexed by `size - 1`.
    pub group_modifiers: Vec<f64>,
    /// Reduction per member beyond the end of `group_modifiers`.
    pub group_penalty_step: f64,
    pub group_modifier_floor: f64,
    pub npc_kill_awards: Vec<u32>,
    pub pvp_kill_awards: Vec<u32>,
    pub ghost_duration: u32,
    pub npc_corpse_decay: u32,
    pub player_corpse_decay: u32,
    /// NPC corpse coins vary by up to this percent either way.
    pub coin_variance: u8,
    pub bonus_armor_chance: u8,
    pub autosac_reward: u64,
    /// Every n-th death costs a point of constitution.
    pub constitution_loss_interval: u32,
    /// Largest haggle discount, in percent.
    pub haggle_cap: u8,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            npc_default_proficiency: 75,
            min_weapon_proficiency: 1,
            critical_chance: 5,
            hint_chance: 20,
            improve_on_success: 5,
            improve_on_failure: 10,
            experience: ExperienceTable::default(),
            levels: LevelTable::default(),
            group_modifiers: vec![1.0, 0.85, 1.5, 0.75],
            group_penalty_step: 0.10,
            group_modifier_floor: 0.25,
            npc_kill_awards: vec![10, 100, 500, 1000, 5000],
            pvp_kill_awards: vec![1, 5, 10, 25, 50, 100],
            ghost_duration: 30,
            npc_corpse_decay: 100,
            player_corpse_decay: 500,
            coin_variance: 20,
            bonus_armor_chance: 50,
            autosac_reward: 1,
            constitution_loss_interval: 4,
            haggle_cap: 25,
        }
    }
}

impl CombatConfig {
    /// Multiplier applied to each member's experience for a group of `size`.
    pub fn group_modifier(&self, size: usize) -> f64 {
        let size = size.max(1);
        if let Some(modifier) = self.group_modifiers.get(size - 1) {
            return *modifier;
        }
        let Some(last) = self.group_modifiers.last() else {
            return 1.0;
        };
        let beyond = (size - self.group_modifiers.len()) as f64;
        (last - self.group_penalty_step * beyond).max(self.group_modifier_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_modifier_table_and_tail() {
        let config = CombatConfig::default();
        assert_eq!(config.group_modifier(1), 1.0);
        assert_eq!(config.group_modifier(2), 0.85);
        assert_eq!(config.group_modifier(3), 1.5);
        assert_eq!(config.group_modifier(4), 0.75);
        assert!((config.group_modifier(5) - 0.65).abs() < 1e-9);
        assert!((config.group_modifier(6) - 0.55).abs() < 1e-9);
        assert_eq!(config.group_modifier(20), 0.25);
    }

    #[test]
    fn level_threshold_is_quadratic() {
        let levels = LevelTable::default();
        assert_eq!(levels.threshold(1), 1000);
        assert_eq!(levels.threshold(10), 100_000);
    }
}
