//! The stock arena: a small adventuring party against a goblin pack.

use combat_core::{
    ArmorRating, CombatFlags, Combatant, DamageType, EntityId, GroupBook, GroupRegistry, Item,
    RoomId, WearSlot,
};
use combat_runtime::InMemoryPopulation;

pub const ARENA: RoomId = RoomId(1);
pub const TEMPLE: RoomId = RoomId(2);

/// Population, groups and opening engagements for one arena run.
pub struct Scenario {
    pub population: InMemoryPopulation,
    pub groups: GroupBook,
    pub engagements: Vec<(EntityId, EntityId)>,
}

pub fn party_vs_goblins() -> anyhow::Result<Scenario> {
    let ada = Combatant::player(EntityId(1), "Ada", 12)
        .with_location(ARENA)
        .with_home(TEMPLE)
        .with_flags(CombatFlags::AUTOLOOT)
        .with_equipped(Item::weapon("a longsword", "sword", "slash", DamageType::Slash))
        .with_equipped(Item::armor(
            "a chain shirt",
            WearSlot::Torso,
            ArmorRating::uniform(15),
            20,
        ))
        .with_proficiency("sword", 85)
        .with_proficiency("parry", 40)
        .with_proficiency("second attack", 60);

    let bram = Combatant::player(EntityId(2), "Bram", 10)
        .with_location(ARENA)
        .with_home(TEMPLE)
        .with_equipped(Item::weapon("a mace", "mace", "crush", DamageType::Blunt))
        .with_proficiency("mace", 70)
        .with_proficiency("dodge", 30);

    let chief = Combatant::npc(EntityId(10), "the goblin chief", 14)
        .with_location(ARENA)
        .with_dice(2, 6)
        .with_gold(120)
        .with_proficiency("parry", 25);
    let grunt = Combatant::npc(EntityId(11), "a goblin grunt", 8)
        .with_location(ARENA)
        .with_gold(15);

    let mut groups = GroupBook::new();
    let party = groups.create(ada.id)?;
    groups.join(party, bram.id)?;
    let pack = groups.create(chief.id)?;
    groups.join(pack, grunt.id)?;

    let engagements = vec![(ada.id, chief.id), (bram.id, grunt.id)];
    let population = [ada, bram, chief, grunt].into_iter().collect();

    Ok(Scenario {
        population,
        groups,
        engagements,
    })
}
