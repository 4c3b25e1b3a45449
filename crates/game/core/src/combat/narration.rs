//! Combat text: damage verbs, condition bands and hit/miss lines.

use super::{CombatEnv, SoundCue};
use crate::action::Action;
use crate::state::Combatant;

/// Severity ladder; each entry is the smallest damage that earns the verb.
const DAMAGE_VERBS: [(u32, &str); 16] = [
    (150, "does UNSPEAKABLE things to"),
    (100, "MANGLES"),
    (75, "MASSACRES"),
    (60, "DISMEMBERS"),
    (50, "DISEMBOWELS"),
    (40, "MUTILATES"),
    (30, "maims"),
    (25, "devastates"),
    (20, "decimates"),
    (15, "mauls"),
    (11, "wounds"),
    (7, "injures"),
    (5, "hits"),
    (3, "grazes"),
    (1, "scratches"),
    (0, "has no real effect on"),
];

/// Verb describing `damage` on the severity ladder.
pub fn damage_verb(damage: u32) -> &'static str {
    DAMAGE_VERBS
        .iter()
        .find(|(floor, _)| damage >= *floor)
        .map(|(_, verb)| *verb)
        .unwrap_or("has no real effect on")
}

/// Qualitative health band, phrased to follow the combatant's name.
pub fn health_condition(combatant: &Combatant) -> &'static str {
    match combatant.vitals.health.percent() {
        100.. => "is in excellent condition.",
        90..=99 => "has a few scratches.",
        75..=89 => "has some small wounds and bruises.",
        50..=74 => "has quite a few wounds.",
        30..=49 => "has some big nasty wounds and scratches.",
        15..=29 => "looks pretty hurt.",
        1..=14 => "is in awful condition.",
        0 => "is bleeding awfully from big wounds.",
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn narrate_miss(
    attacker: &Combatant,
    target: &Combatant,
    action: &Action,
    env: &mut CombatEnv<'_>,
) {
    let noun = &action.noun;
    env.outbox
        .tell(attacker, format!("Your {noun} misses {}.", target.name));
    env.outbox.tell(
        target,
        format!("{}'s {noun} misses you.", capitalize(&attacker.name)),
    );
    env.outbox.room(
        target.location,
        &[attacker.id, target.id],
        format!(
            "{}'s {noun} misses {}.",
            capitalize(&attacker.name),
            target.name
        ),
    );
    env.outbox.sound(attacker, SoundCue::Miss);
}

pub(crate) fn narrate_hit(
    attacker: &Combatant,
    target: &Combatant,
    action: &Action,
    damage: u32,
    critical: bool,
    env: &mut CombatEnv<'_>,
) {
    let noun = &action.noun;
    let verb = damage_verb(damage);
    let prefix = if critical { "*CRITICAL* " } else { "" };
    env.outbox.tell(
        attacker,
        format!("{prefix}Your {noun} {verb} {}.", target.name),
    );
    env.outbox.tell(
        target,
        format!("{prefix}{}'s {noun} {verb} you.", capitalize(&attacker.name)),
    );
    env.outbox.room(
        target.location,
        &[attacker.id, target.id],
        format!(
            "{}'s {noun} {verb} {}.",
            capitalize(&attacker.name),
            target.name
        ),
    );
    let cue = if critical {
        SoundCue::Critical
    } else {
        SoundCue::Hit
    };
    env.outbox.sound(attacker, cue);
    env.outbox.sound(target, cue);
}
