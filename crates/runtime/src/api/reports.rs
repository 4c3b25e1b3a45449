//! Summaries of what the engine did, for callers, logs and tests.

use combat_core::{
    AttackReport, Award, EffectKind, EntityId, ExperienceGain, LootOutcome, RoomId, Tick,
};
use serde::{Deserialize, Serialize};

/// One resolved attack attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub attacker: EntityId,
    pub target: EntityId,
    /// Name of the action used.
    pub action: String,
    pub report: AttackReport,
}

/// The corpse left behind by a death.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpseSummary {
    pub room: RoomId,
    pub items: usize,
    /// Coin total placed in the corpse before any looting.
    pub coins: u64,
    pub bonus_armor: bool,
    /// False when the corpse was sacrificed or the room refused it.
    pub placed: bool,
}

/// Everything that followed one death.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeathReport {
    pub killer: EntityId,
    pub victim: EntityId,
    pub victim_name: String,
    pub room: RoomId,
    pub corpse: CorpseSummary,
    pub loot: LootOutcome,
    pub award: Option<Award>,
    pub experience: Vec<ExperienceGain>,
    /// True when experience went through the killer's group.
    pub grouped: bool,
    pub constitution_lost: bool,
    /// NPC victims leave the population.
    pub removed: bool,
    /// Other attackers of the victim and their new target, if any.
    pub retargeted: Vec<(EntityId, Option<EntityId>)>,
}

/// A round that failed and was skipped without stopping the tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFailure {
    pub attacker: EntityId,
    pub code: String,
    pub message: String,
}

/// Result of one scheduler tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    /// Combatants that drove a round this tick.
    pub rounds: usize,
    pub attacks: Vec<AttackRecord>,
    pub deaths: Vec<DeathReport>,
    pub expired: Vec<(EntityId, EffectKind)>,
    pub failures: Vec<RoundFailure>,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn total_damage(&self) -> u64 {
        self.attacks
            .iter()
            .map(|record| u64::from(record.report.damage))
            .sum()
    }

    /// True when nothing at all happened.
    pub fn is_quiet(&self) -> bool {
        self.rounds == 0 && self.deaths.is_empty() && self.expired.is_empty()
    }
}
