//! Death consequences: corpses, looting, penalties and kill awards.
//!
//! These are the pure pieces of the death sequence. The runtime's death
//! handler runs them in order (announce, record kill, build corpse, loot,
//! penalize) and handles registry and room side effects around them.
mod awards;
mod corpse;
mod loot;
mod penalty;

pub use awards::{Award, AwardKind, record_kill};
pub use corpse::{CorpseBuild, bonus_armor, build_corpse};
pub use loot::{LootOutcome, auto_loot};
pub use penalty::apply_death_penalty;

use crate::combat::narration::capitalize;
use crate::combat::{Outbox, SoundCue};
use crate::state::Combatant;

/// Tells the victim, and everyone else in the room, that they died.
pub fn announce_death(victim: &Combatant, outbox: &mut Outbox) {
    outbox.tell(victim, "You are DEAD!!");
    outbox.sound(victim, SoundCue::Death);
    outbox.room(
        victim.location,
        &[victim.id],
        format!("{} is DEAD!!", capitalize(&victim.name)),
    );
}
