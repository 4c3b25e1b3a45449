//! Kill experience and level advancement.
mod experience;
mod level;

pub use experience::{ExperienceGain, group_share, kill_experience};
pub use level::{LevelAdvance, advance_levels, experience_to_next, grant_experience};
