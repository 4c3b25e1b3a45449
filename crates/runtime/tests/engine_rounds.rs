use std::sync::Arc;

use combat_core::{
    ActiveEffect, AttackOutcome, CombatFlags, Combatant, EffectKind, EntityId, RoomId,
    ScriptedRng,
};
use combat_runtime::{
    CombatEngine, CombatError, InMemoryPopulation, InMemoryRooms, RecordingMessenger,
    RuntimeConfig,
};

const ADA: EntityId = EntityId(1);
const GOBLIN: EntityId = EntityId(2);
const BRAM: EntityId = EntityId(3);

fn ada() -> Combatant {
    Combatant::player(ADA, "Ada", 20)
        .with_location(RoomId(1))
        .with_proficiency("hand to hand", 95)
}

fn goblin() -> Combatant {
    Combatant::npc(GOBLIN, "a goblin", 10).with_location(RoomId(1))
}

fn engine(
    combatants: impl IntoIterator<Item = Combatant>,
    rng: ScriptedRng,
) -> (CombatEngine, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::new());
    let engine = CombatEngine::builder()
        .population(combatants.into_iter().collect::<InMemoryPopulation>())
        .rng(rng)
        .messenger(messenger.clone())
        .build()
        .expect("engine should build");
    (engine, messenger)
}

#[tokio::test]
async fn engage_makes_an_idle_target_fight_back() {
    let (mut engine, messenger) = engine([ada(), goblin()], ScriptedRng::constant(50));

    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");

    let population = engine.population();
    assert_eq!(population.get(ADA).and_then(|c| c.fighting), Some(GOBLIN));
    assert_eq!(population.get(GOBLIN).and_then(|c| c.fighting), Some(ADA));
    assert!(engine.has_fights());
    assert_eq!(messenger.lines_for(ADA), vec!["You attack a goblin!"]);
}

#[tokio::test]
async fn engage_refuses_invalid_targets() {
    let far_goblin = goblin().with_location(RoomId(7));
    let (mut engine, _) = engine([ada(), far_goblin], ScriptedRng::constant(50));

    let err = engine.engage(ADA, ADA).await.unwrap_err();
    assert!(matches!(err, CombatError::InvalidTarget { .. }));

    let err = engine.engage(ADA, GOBLIN).await.unwrap_err();
    assert!(matches!(
        err,
        CombatError::InvalidTarget {
            reason: "not in the same room",
            ..
        }
    ));

    let err = engine.engage(ADA, EntityId(99)).await.unwrap_err();
    assert!(matches!(err, CombatError::UnknownCombatant(EntityId(99))));
    assert!(!engine.has_fights());
}

#[tokio::test]
async fn ghosts_cannot_be_engaged() {
    let ghost = goblin().with_flags(CombatFlags::GHOST);
    let (mut engine, _) = engine([ada(), ghost], ScriptedRng::constant(50));

    let err = engine.engage(ADA, GOBLIN).await.unwrap_err();
    assert!(matches!(
        err,
        CombatError::InvalidTarget {
            reason: "ghosts cannot fight",
            ..
        }
    ));
}

#[tokio::test]
async fn player_fights_are_limited_by_level_range() {
    let bram = Combatant::player(BRAM, "bram", 1).with_location(RoomId(1));
    let (mut engine, messenger) = engine([ada(), bram], ScriptedRng::constant(50));

    let err = engine.engage(ADA, BRAM).await.unwrap_err();

    assert!(matches!(err, CombatError::InvalidTarget { .. }));
    assert_eq!(
        messenger.lines_for(ADA),
        vec!["Bram is beyond your fighting range."]
    );
}

#[tokio::test]
async fn player_round_includes_retaliation_and_condition() {
    let (mut engine, messenger) = engine([ada(), goblin()], ScriptedRng::constant(50));
    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");

    let report = engine.tick().await.expect("tick should succeed");

    assert_eq!(report.rounds, 1, "only the player drives the round");
    assert!(report.deaths.is_empty());
    let by_ada = report.attacks.iter().filter(|a| a.attacker == ADA).count();
    let by_goblin = report.attacks.iter().filter(|a| a.attacker == GOBLIN).count();
    assert_eq!(by_ada, 1);
    assert_eq!(by_goblin, 1);
    assert!(report.total_damage() > 0);
    assert!(
        messenger
            .lines_for(ADA)
            .iter()
            .any(|line| line.starts_with("A goblin "))
    );
}

#[tokio::test]
async fn trained_bonus_attacks_follow_the_primary() {
    let fighter = ada().with_proficiency("second attack", 95);
    let (mut engine, _) = engine([fighter, goblin()], ScriptedRng::constant(50));
    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");

    let report = engine.tick().await.expect("tick should succeed");

    let by_ada = report.attacks.iter().filter(|a| a.attacker == ADA).count();
    assert_eq!(by_ada, 2);
}

#[tokio::test]
async fn untrained_player_fumbles_without_bonus_attacks() {
    let novice = Combatant::player(ADA, "Ada", 20)
        .with_location(RoomId(1))
        .with_proficiency("second attack", 95);
    let (mut engine, messenger) = engine([novice, goblin()], ScriptedRng::constant(0));
    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");

    let report = engine.tick().await.expect("tick should succeed");

    let swings: Vec<_> = report.attacks.iter().filter(|a| a.attacker == ADA).collect();
    assert_eq!(swings.len(), 1);
    assert_eq!(swings[0].report.outcome, AttackOutcome::Missed);
    assert!(
        messenger
            .lines_for(ADA)
            .iter()
            .any(|line| line.ends_with("Some training in hand to hand would help."))
    );
}

#[tokio::test]
async fn victim_slain_earlier_in_the_tick_is_not_attacked_again() {
    let bram = Combatant::player(BRAM, "Bram", 20)
        .with_location(RoomId(1))
        .with_proficiency("hand to hand", 95);
    let frail = goblin().with_health(3, 60);
    let rooms = InMemoryRooms::new();
    let mut engine = CombatEngine::builder()
        .population(
            InMemoryPopulation::new()
                .with(ada())
                .with(bram)
                .with(frail),
        )
        .rooms(rooms.clone())
        .rng(ScriptedRng::constant(50))
        .build()
        .expect("engine should build");

    engine.engage(ADA, GOBLIN).await.expect("ada engages");
    engine.engage(BRAM, GOBLIN).await.expect("bram engages");
    let report = engine.tick().await.expect("tick should succeed");

    assert_eq!(report.deaths.len(), 1);
    assert_eq!(report.deaths[0].killer, ADA);
    assert!(report.failures.is_empty());
    assert_eq!(rooms.corpses_in(RoomId(1)).len(), 1);
    assert!(report.attacks.iter().all(|a| a.attacker == ADA));
    assert!(report.attacks.iter().all(|a| a.target == GOBLIN));
    assert!(engine.population().get(GOBLIN).is_none());
    assert!(!engine.population().get(BRAM).expect("bram").is_fighting());
    assert!(!engine.has_fights());
}

#[tokio::test]
async fn fight_stops_when_target_leaves_the_room() {
    let (mut engine, _) = engine([ada(), goblin()], ScriptedRng::constant(50));
    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");
    if let Some(goblin) = engine.population_mut().get_mut(GOBLIN) {
        goblin.location = RoomId(2);
    }

    let report = engine.tick().await.expect("tick should succeed");

    assert_eq!(report.rounds, 0);
    assert!(report.attacks.is_empty());
    assert!(!engine.population().get(ADA).is_some_and(|c| c.is_fighting()));
}

#[tokio::test]
async fn disengage_releases_attackers() {
    let bram = Combatant::player(BRAM, "Bram", 18)
        .with_location(RoomId(1))
        .with_proficiency("hand to hand", 80);
    let (mut engine, messenger) = engine([ada(), goblin(), bram], ScriptedRng::constant(50));
    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");
    engine.engage(BRAM, GOBLIN).await.expect("engage should succeed");

    let released = engine.disengage(GOBLIN).await.expect("disengage should succeed");

    assert_eq!(released, vec![ADA, BRAM]);
    assert!(!engine.has_fights());
    assert!(messenger.lines_for(GOBLIN).is_empty(), "NPCs get no lines");
}

#[tokio::test]
async fn effects_expire_at_the_start_of_a_tick() {
    let mut blinded = ada();
    blinded.add_effect(ActiveEffect::new(EffectKind::Blinded, 1));
    blinded.flags.insert(CombatFlags::GHOST);
    blinded.add_effect(ActiveEffect::new(EffectKind::Ghost, 1));
    let (mut engine, messenger) = engine([blinded], ScriptedRng::constant(50));

    let report = engine.tick().await.expect("tick should succeed");

    assert_eq!(
        report.expired,
        vec![(ADA, EffectKind::Blinded), (ADA, EffectKind::Ghost)]
    );
    assert!(!report.is_quiet());
    let ada = engine.population().get(ADA).expect("ada is present");
    assert!(!ada.is_ghost());
    assert_eq!(
        messenger.lines_for(ADA),
        vec!["You can see again.", "Your body becomes solid once more."]
    );
}

#[tokio::test]
async fn named_attack_requires_a_known_action() {
    let (mut engine, _) = engine([ada(), goblin()], ScriptedRng::constant(50));

    let err = engine.attack(ADA, GOBLIN, "moonbeam").await.unwrap_err();
    assert!(matches!(err, CombatError::UnknownAction(name) if name == "moonbeam"));

    let err = engine.attack(ADA, GOBLIN, "dodge").await.unwrap_err();
    assert!(matches!(err, CombatError::UnknownAction(name) if name == "dodge"));
    assert!(!engine.has_fights());

    let (record, death) = engine
        .attack(ADA, GOBLIN, "kick")
        .await
        .expect("kick should resolve");
    assert_eq!(record.action, "kick");
    assert!(death.is_none());
    assert_eq!(
        engine.population().get(ADA).and_then(|c| c.fighting),
        Some(GOBLIN)
    );
}

#[tokio::test]
async fn cancelled_engine_refuses_to_tick() {
    let (mut engine, _) = engine([ada(), goblin()], ScriptedRng::constant(50));
    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");

    engine.cancellation().cancel();

    let err = engine.tick().await.unwrap_err();
    assert!(matches!(err, CombatError::Cancelled));
}

#[tokio::test]
async fn tables_file_overrides_embedded_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("combat.toml");
    std::fs::write(&path, "critical_chance = 0\nhint_chance = 40\n").expect("write tables");

    let config = RuntimeConfig {
        tables_path: Some(path),
        seed: Some(7),
        ..RuntimeConfig::default()
    };
    let engine = CombatEngine::builder()
        .runtime_config(&config)
        .build()
        .expect("engine should build");

    assert_eq!(engine.config().critical_chance, 0);
    assert_eq!(engine.config().hint_chance, 40);
    assert_eq!(engine.config().min_weapon_proficiency, 1);
}

#[tokio::test]
async fn broken_tables_file_fails_the_build() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("combat.toml");
    std::fs::write(&path, "critical_chance = \"often\"\n").expect("write tables");

    let config = RuntimeConfig {
        tables_path: Some(path),
        ..RuntimeConfig::default()
    };
    let result = CombatEngine::builder().runtime_config(&config).build();

    assert!(matches!(result, Err(CombatError::Content(_))));
}

#[tokio::test]
async fn tick_report_serializes() {
    let (mut engine, _) = engine([ada(), goblin()], ScriptedRng::constant(50));
    engine.engage(ADA, GOBLIN).await.expect("engage should succeed");

    let report = engine.tick().await.expect("tick should succeed");
    let json = serde_json::to_value(&report).expect("report should serialize");

    assert_eq!(json["tick"], 1);
    assert_eq!(json["rounds"], 1);
}
