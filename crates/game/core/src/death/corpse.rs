use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::state::{ArmorRating, Combatant, Corpse, CorpseKind, Item, WearSlot};

/// A freshly built corpse with a summary for logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpseBuild {
    pub corpse: Corpse,
    /// Currency placed in the corpse as coin items.
    pub coins: u64,
    /// True when an NPC corpse received a bonus armor drop.
    pub bonus: bool,
}

/// Builds the corpse for `victim` without touching the victim.
///
/// Equipment and inventory are deep-copied; all currency (loose gold and coin
/// items) is pooled into one coin pile. NPC corpses vary the coin amount by up
/// to `coin_variance` percent and may receive a bonus armor drop.
pub fn build_corpse(
    victim: &Combatant,
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> CorpseBuild {
    let kind = if victim.is_npc() {
        CorpseKind::Npc
    } else {
        CorpseKind::Player
    };

    let mut contents: Vec<Item> = victim
        .equipment
        .iter()
        .map(|(_, item)| item.clone())
        .collect();
    contents.extend(victim.inventory.iter().filter(|i| !i.is_coins()).cloned());

    let mut coins = victim.wealth();
    if victim.is_npc() && coins > 0 && config.coin_variance > 0 {
        let variance = i32::from(config.coin_variance.min(100));
        let percent = 100 - variance + rng.range(0, 2 * variance + 1);
        coins = coins.saturating_mul(percent.max(0) as u64) / 100;
    }
    if coins > 0 {
        contents.push(Item::coins(coins));
    }

    let bonus = victim.is_npc() && rng.chance(u32::from(config.bonus_armor_chance));
    if bonus {
        contents.push(bonus_armor(victim.level, rng));
    }

    let decay_ticks = match kind {
        CorpseKind::Npc => config.npc_corpse_decay,
        CorpseKind::Player => config.player_corpse_decay,
    };

    CorpseBuild {
        corpse: Corpse {
            name: format!("the corpse of {}", victim.name),
            kind,
            owner: victim.id,
            room: victim.location,
            level: victim.level,
            contents,
            decay_ticks,
        },
        coins,
        bonus,
    }
}

/// A random armor piece scaled to `level`.
pub fn bonus_armor(level: u32, rng: &mut dyn RngOracle) -> Item {
    let slot = WearSlot::ARMOR[rng.pick(WearSlot::ARMOR.len())];
    let material = match level {
        0..=9 => "a leather",
        10..=24 => "a bronze",
        25..=49 => "an iron",
        _ => "a mithril",
    };
    let piece = match slot {
        WearSlot::Head => "helm",
        WearSlot::Neck => "gorget",
        WearSlot::Torso => "breastplate",
        WearSlot::Arms => "armguard",
        WearSlot::Wrist => "bracer",
        WearSlot::Hands => "gauntlet",
        WearSlot::Waist => "girdle",
        WearSlot::Legs => "legguard",
        WearSlot::Feet => "sabaton",
        _ => "shield",
    };
    let rating = (level / 4 + 2).min(25) as u8;
    let durability = (20 + level).min(u32::from(u16::MAX)) as u16;
    Item::armor(
        format!("{material} {piece}"),
        slot,
        ArmorRating::uniform(rating),
        durability,
    )
    .with_level(level)
}
