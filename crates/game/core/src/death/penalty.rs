use crate::combat::Outbox;
use crate::config::CombatConfig;
use crate::state::{ActiveEffect, CombatFlags, Combatant, EffectKind};

/// Applies the player death penalty. NPCs are untouched.
///
/// The victim becomes a ghost for `ghost_duration` ticks, loses everything
/// carried and worn, wakes at home with 1 health, and loses a point of
/// constitution on every `constitution_loss_interval`-th death. Returns true
/// when constitution was lost.
pub fn apply_death_penalty(
    victim: &mut Combatant,
    config: &CombatConfig,
    outbox: &mut Outbox,
) -> bool {
    if !victim.is_player() {
        return false;
    }

    victim.stop_fighting();
    victim.metrics.deaths += 1;
    victim.flags.insert(CombatFlags::GHOST);
    victim.add_effect(ActiveEffect::new(EffectKind::Ghost, config.ghost_duration));

    victim.inventory.clear();
    victim.equipment.drain();
    victim.gold = 0;
    victim.location = victim.home;
    victim.vitals.health.set(1);

    outbox.tell(
        victim,
        "Your spirit drifts home. You will walk as a ghost for a while.",
    );

    let interval = config.constitution_loss_interval;
    let lose = interval > 0
        && victim.metrics.deaths % interval == 0
        && victim.attributes.constitution > 1;
    if lose {
        victim.attributes.constitution -= 1;
        outbox.tell(victim, "You feel less healthy.");
    }
    lose
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, Item, RoomId};

    #[test]
    fn player_is_stripped_and_sent_home_as_ghost() {
        let mut ada = Combatant::player(EntityId(1), "Ada", 10)
            .with_location(RoomId(7))
            .with_home(RoomId(1))
            .with_gold(55)
            .with_item(Item::trinket("a locket"))
            .with_health(-12, 120);
        let mut outbox = Outbox::new();

        let lost = apply_death_penalty(&mut ada, &CombatConfig::default(), &mut outbox);

        assert!(!lost);
        assert!(ada.is_ghost());
        assert!(ada.has_effect(EffectKind::Ghost));
        assert_eq!(ada.location, RoomId(1));
        assert_eq!(ada.gold, 0);
        assert!(ada.inventory.is_empty());
        assert!(ada.equipment.is_empty());
        assert_eq!(ada.vitals.health.current(), 1);
        assert_eq!(ada.metrics.deaths, 1);
    }

    #[test]
    fn every_fourth_death_costs_constitution() {
        let mut ada = Combatant::player(EntityId(1), "Ada", 10);
        ada.metrics.deaths = 3;
        let mut outbox = Outbox::new();

        assert!(apply_death_penalty(&mut ada, &CombatConfig::default(), &mut outbox));
        assert_eq!(ada.attributes.constitution, 12);
        assert!(!apply_death_penalty(&mut ada, &CombatConfig::default(), &mut outbox));
    }

    #[test]
    fn npcs_have_no_penalty() {
        let mut rat = Combatant::npc(EntityId(2), "the rat", 1).with_gold(3);
        let mut outbox = Outbox::new();
        assert!(!apply_death_penalty(&mut rat, &CombatConfig::default(), &mut outbox));
        assert_eq!(rat.gold, 3);
        assert!(!rat.is_ghost());
    }
}
