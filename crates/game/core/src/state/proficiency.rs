//! Skill and spell proficiency records.

/// Well-known proficiency keys consulted directly by the combat rules.
pub mod skills {
    pub const HAND_TO_HAND: &str = "hand to hand";
    pub const DODGE: &str = "dodge";
    pub const PARRY: &str = "parry";
    pub const EVASIVE_MANEUVERS: &str = "evasive maneuvers";
    pub const SECOND_ATTACK: &str = "second attack";
    pub const THIRD_ATTACK: &str = "third attack";
    pub const FOURTH_ATTACK: &str = "fourth attack";
    pub const CRITICAL_STRIKE: &str = "critical strike";

    /// Bonus attack skills in the order they are attempted each round.
    pub const BONUS_ATTACKS: [&str; 3] = [SECOND_ATTACK, THIRD_ATTACK, FOURTH_ATTACK];
}

/// Proficiency in a single skill or spell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proficiency {
    /// Mastery percentage, 0..=100.
    pub percent: u8,
    /// Number of improvement checks since the last gain.
    pub progress: u16,
}

impl Proficiency {
    pub const MAX: u8 = 100;

    pub fn new(percent: u8) -> Self {
        Self {
            percent: percent.min(Self::MAX),
            progress: 0,
        }
    }

    pub fn is_mastered(&self) -> bool {
        self.percent >= Self::MAX
    }
}
