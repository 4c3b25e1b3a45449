use crate::combat::Outbox;
use crate::config::CombatConfig;
use crate::state::{CombatFlags, Combatant, Corpse};

/// What the killer's autoloot and autosac preferences did with a corpse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootOutcome {
    /// Non-coin items moved to the killer's inventory.
    pub items: usize,
    /// Coins moved to the killer's purse.
    pub coins: u64,
    /// Reward paid when the corpse was sacrificed.
    pub sacrificed: Option<u64>,
}

impl LootOutcome {
    /// True when the corpse should not be placed in the room.
    pub fn consumed_corpse(&self) -> bool {
        self.sacrificed.is_some()
    }
}

/// Applies the killer's autoloot, then autosac, to an NPC corpse.
///
/// Player corpses and NPC killers are left alone.
pub fn auto_loot(
    killer: &mut Combatant,
    corpse: &mut Corpse,
    config: &CombatConfig,
    outbox: &mut Outbox,
) -> LootOutcome {
    let mut outcome = LootOutcome::default();
    if !corpse.is_npc_corpse() || killer.is_npc() {
        return outcome;
    }

    if killer.flags.contains(CombatFlags::AUTOLOOT) && !corpse.is_empty() {
        for item in corpse.contents.drain(..) {
            if item.is_coins() {
                outcome.coins += item.coin_value();
            } else {
                outcome.items += 1;
                outbox.tell(killer, format!("You get {} from {}.", item.name, corpse.name));
                killer.inventory.push(item);
            }
        }
        if outcome.coins > 0 {
            killer.gold = killer.gold.saturating_add(outcome.coins);
            outbox.tell(
                killer,
                format!("There were {} coins in {}.", outcome.coins, corpse.name),
            );
        }
    }

    if killer.flags.contains(CombatFlags::AUTOSAC) {
        let reward = config.autosac_reward;
        killer.gold = killer.gold.saturating_add(reward);
        outbox.tell(
            killer,
            format!(
                "You sacrifice {} to the gods and receive {reward} gold.",
                corpse.name
            ),
        );
        outcome.sacrificed = Some(reward);
    }

    outcome
}
