//! Single attack resolution.

use super::defense::{Absorption, DefenseKind, check_active_defense, check_armor_absorption};
use super::narration::{capitalize, narrate_hit, narrate_miss};
use super::{CombatEnv, calculate_damage, check_proficiency};
use crate::action::{Action, ActionFailure, HookContext};
use crate::state::{Combatant, skills};

/// How an attack attempt ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Refused by the PvP policy.
    Rejected,
    /// Prerequisites unmet or the action fizzled.
    Failed(ActionFailure),
    Missed,
    Defended(DefenseKind),
    Absorbed(Absorption),
    Hit { damage: u32, critical: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub outcome: AttackOutcome,
    /// Damage applied to the target.
    pub damage: u32,
    /// The target's health was driven to zero or below.
    pub lethal: bool,
}

impl AttackReport {
    fn unharmed(outcome: AttackOutcome) -> Self {
        Self {
            outcome,
            damage: 0,
            lethal: false,
        }
    }

    pub fn landed(&self) -> bool {
        matches!(self.outcome, AttackOutcome::Hit { .. })
    }
}

/// Resolves one attack attempt from `attacker` against `target`.
///
/// Steps, in order: PvP gate, the side-effect free `check` hook, accuracy (the
/// `is_success` hook for invokable actions, a proficiency roll otherwise),
/// active defense, armor, `pre_action` (costs such as mana), `act`, damage with
/// the critical multiplier when `critical` is set, `post_action`, narration,
/// and finally applying the damage. A lethal result ends the fight on both
/// sides; death handling is left to the caller.
pub fn resolve_attack(
    attacker: &mut Combatant,
    target: &mut Combatant,
    action: &Action,
    critical: bool,
    env: &mut CombatEnv<'_>,
) -> AttackReport {
    if !env.pvp.permits(attacker, target) {
        env.outbox.tell(
            attacker,
            format!("{} is beyond your fighting range.", capitalize(&target.name)),
        );
        return AttackReport::unharmed(AttackOutcome::Rejected);
    }

    if let Err(failure) = action.hooks().check(action, attacker) {
        env.outbox.tell(attacker, failure.to_string());
        return AttackReport::unharmed(AttackOutcome::Failed(failure));
    }

    let accurate = if action.invokable {
        let mut ctx = HookContext {
            attacker: &mut *attacker,
            target: &mut *target,
            env: &mut *env,
        };
        action.hooks().is_success(action, &mut ctx)
    } else {
        check_proficiency(attacker, action.skill_key(), env)
    };
    if !accurate {
        if action.is_spell() {
            let failure = ActionFailure::LostConcentration;
            env.outbox.tell(attacker, failure.to_string());
            return AttackReport::unharmed(AttackOutcome::Failed(failure));
        }
        narrate_miss(attacker, target, action, env);
        return AttackReport::unharmed(AttackOutcome::Missed);
    }

    if let Some(kind) = check_active_defense(target, attacker, action, env) {
        return AttackReport::unharmed(AttackOutcome::Defended(kind));
    }
    if let Some(absorption) = check_armor_absorption(target, attacker, action, env) {
        return AttackReport::unharmed(AttackOutcome::Absorbed(absorption));
    }

    let paid = {
        let mut ctx = HookContext {
            attacker: &mut *attacker,
            target: &mut *target,
            env: &mut *env,
        };
        let paid = action.hooks().pre_action(action, &mut ctx);
        if paid.is_ok() {
            action.hooks().act(action, &mut ctx);
        }
        paid
    };
    if let Err(failure) = paid {
        env.outbox.tell(attacker, failure.to_string());
        return AttackReport::unharmed(AttackOutcome::Failed(failure));
    }

    let mut damage = calculate_damage(attacker, target, action, env.rng);
    let critical = critical && damage > 0;
    if critical {
        let trained = attacker.proficiency(skills::CRITICAL_STRIKE) > 0;
        let multiplier = if trained && check_proficiency(attacker, skills::CRITICAL_STRIKE, env) {
            3
        } else {
            2
        };
        damage = damage.saturating_mul(multiplier);
    }

    {
        let mut ctx = HookContext {
            attacker: &mut *attacker,
            target: &mut *target,
            env: &mut *env,
        };
        action.hooks().post_action(action, &mut ctx);
    }

    narrate_hit(attacker, target, action, damage, critical, env);
    target.vitals.health.reduce(damage);
    let lethal = !target.is_alive();
    if lethal {
        attacker.stop_fighting();
        target.stop_fighting();
    }

    AttackReport {
        outcome: AttackOutcome::Hit { damage, critical },
        damage,
        lethal,
    }
}

/// A swing by a player too unskilled with their weapon to connect.
///
/// Always misses and draws nothing but the optional training hint.
pub fn untrained_swing(
    attacker: &Combatant,
    target: &Combatant,
    action: &Action,
    env: &mut CombatEnv<'_>,
) -> AttackReport {
    narrate_miss(attacker, target, action, env);
    if env.rng.chance(u32::from(env.config.hint_chance)) {
        env.outbox.tell(
            attacker,
            format!(
                "You fumble with your {}. Some training in {} would help.",
                action.noun,
                action.skill_key()
            ),
        );
    }
    AttackReport::unharmed(AttackOutcome::Missed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, DamageType, HookSpec, StandardHooks};
    use crate::combat::Outbox;
    use crate::config::CombatConfig;
    use crate::env::{LevelRange, PvpPolicy, ScriptedRng};
    use crate::state::{ArmorRating, EntityId, Item, WearSlot};
    use std::sync::Arc;

    fn attack(
        attacker: &mut Combatant,
        target: &mut Combatant,
        action: &Action,
        critical: bool,
        rng: &mut ScriptedRng,
        pvp: &dyn PvpPolicy,
    ) -> (AttackReport, Outbox) {
        let config = CombatConfig::default();
        let mut outbox = Outbox::new();
        let report = {
            let mut env = CombatEnv::new(rng, &config, pvp, &mut outbox);
            resolve_attack(attacker, target, action, critical, &mut env)
        };
        (report, outbox)
    }

    fn armored_player() -> Combatant {
        Combatant::player(EntityId(2), "Ada", 10)
            .with_proficiency("dodge", 100)
            .with_equipped(Item::armor(
                "a chain shirt",
                WearSlot::Torso,
                ArmorRating::uniform(40),
                10,
            ))
    }

    #[test]
    fn perfect_dodge_negates_without_wearing_armor() {
        let mut orc = Combatant::npc(EntityId(1), "the orc", 10);
        let mut ada = armored_player();
        let health = ada.vitals.health;
        let action = Action::weapon_attack(&orc);

        // Accuracy 1 < 75 hits; dodge 1 < 100 succeeds. Mastered dodge draws no
        // improvement roll.
        let mut rng = ScriptedRng::constant(1);
        let (report, outbox) = attack(
            &mut orc,
            &mut ada,
            &action,
            false,
            &mut rng,
            &LevelRange::unrestricted(),
        );

        assert_eq!(report.outcome, AttackOutcome::Defended(DefenseKind::Dodge));
        assert_eq!(report.damage, 0);
        assert_eq!(ada.vitals.health, health);
        let shirt = ada.equipment.get(WearSlot::Torso).unwrap();
        assert_eq!(shirt.durability().unwrap().current, 10);
        assert_eq!(outbox.lines_for(EntityId(2)), vec!["You dodge the orc's attack."]);
    }

    #[test]
    fn armor_blocks_slash_and_wears_exactly_one_piece() {
        let mut orc = Combatant::npc(EntityId(1), "the orc", 10).with_equipped(Item::weapon(
            "a scimitar",
            "sword",
            "slash",
            DamageType::Slash,
        ));
        let mut guard = Combatant::npc(EntityId(2), "the guard", 10)
            .with_equipped(Item::armor(
                "a chain shirt",
                WearSlot::Torso,
                ArmorRating {
                    slash: 40,
                    ..ArmorRating::default()
                },
                10,
            ))
            .with_equipped(Item::armor(
                "a leather cap",
                WearSlot::Head,
                ArmorRating {
                    blunt: 10,
                    ..ArmorRating::default()
                },
                10,
            ));
        let health = guard.vitals.health;
        let action = Action::weapon_attack(&orc);

        // Accuracy 20 < 75, armor roll 20 < 40, then the piece index.
        let mut rng = ScriptedRng::new([20, 20, 0]);
        let (report, _) = attack(
            &mut orc,
            &mut guard,
            &action,
            true,
            &mut rng,
            &LevelRange::unrestricted(),
        );

        assert!(matches!(report.outcome, AttackOutcome::Absorbed(_)));
        assert_eq!(report.damage, 0);
        assert_eq!(guard.vitals.health, health);
        let shirt = guard.equipment.get(WearSlot::Torso).unwrap();
        let cap = guard.equipment.get(WearSlot::Head).unwrap();
        assert_eq!(shirt.durability().unwrap().current, 9);
        assert_eq!(cap.durability().unwrap().current, 10);
    }

    #[test]
    fn lethal_hit_ends_the_fight() {
        let mut ogre = Combatant::npc(EntityId(1), "the ogre", 20);
        let mut ada = Combatant::player(EntityId(2), "Ada", 1).with_health(5, 30);
        ogre.start_fighting(ada.id);
        ada.start_fighting(ogre.id);
        let action = Action::weapon_attack(&ogre);

        // Hit, 1d4 shows 1, +20 level adjustment.
        let mut rng = ScriptedRng::constant(1);
        let (report, outbox) = attack(
            &mut ogre,
            &mut ada,
            &action,
            false,
            &mut rng,
            &LevelRange::unrestricted(),
        );

        assert_eq!(report.damage, 21);
        assert!(report.lethal);
        assert_eq!(ada.vitals.health.current(), 0);
        assert!(ada.vitals.health.raw() < 0);
        assert!(!ada.is_fighting());
        assert!(!ogre.is_fighting());
        assert_eq!(
            outbox.lines_for(EntityId(2)),
            vec!["The ogre's punch decimates you."]
        );
    }

    #[test]
    fn critical_doubles_without_critical_strike() {
        let mut a = Combatant::npc(EntityId(1), "the wolf", 10);
        let mut b = Combatant::npc(EntityId(2), "the deer", 10);
        let action = Action::weapon_attack(&a);

        let mut rng = ScriptedRng::constant(1);
        let (report, _) = attack(
            &mut a,
            &mut b,
            &action,
            true,
            &mut rng,
            &LevelRange::unrestricted(),
        );
        assert_eq!(
            report.outcome,
            AttackOutcome::Hit {
                damage: 4,
                critical: true
            }
        );
    }

    #[test]
    fn critical_strike_triples() {
        let mut a = Combatant::npc(EntityId(1), "the wolf", 10).with_proficiency("critical strike", 50);
        let mut b = Combatant::npc(EntityId(2), "the deer", 10);
        let action = Action::weapon_attack(&a);

        let mut rng = ScriptedRng::constant(1);
        let (report, _) = attack(
            &mut a,
            &mut b,
            &action,
            true,
            &mut rng,
            &LevelRange::unrestricted(),
        );
        assert_eq!(report.damage, 6);
    }

    #[test]
    fn out_of_range_pvp_is_rejected_untouched() {
        let mut low = Combatant::player(EntityId(1), "Ada", 5);
        let mut high = Combatant::player(EntityId(2), "Bryn", 30);
        let health = high.vitals.health;
        let action = Action::weapon_attack(&low);

        let mut rng = ScriptedRng::constant(1);
        let (report, outbox) = attack(
            &mut low,
            &mut high,
            &action,
            false,
            &mut rng,
            &LevelRange::new(5),
        );
        assert_eq!(report.outcome, AttackOutcome::Rejected);
        assert_eq!(high.vitals.health, health);
        assert_eq!(rng.drawn(), 0);
        assert_eq!(outbox.lines_for(EntityId(2)).len(), 0);
        assert_eq!(
            outbox.lines_for(EntityId(1)),
            vec!["Bryn is beyond your fighting range."]
        );
    }

    #[test]
    fn untrained_player_swing_misses_cleanly() {
        let mut ada = Combatant::player(EntityId(1), "Ada", 5);
        let mut rat = Combatant::npc(EntityId(2), "the rat", 1);
        let action = Action::weapon_attack(&ada);

        let mut rng = ScriptedRng::constant(1);
        let (report, outbox) = attack(
            &mut ada,
            &mut rat,
            &action,
            false,
            &mut rng,
            &LevelRange::unrestricted(),
        );
        assert_eq!(report.outcome, AttackOutcome::Missed);
        assert_eq!(rng.drawn(), 0);
        assert_eq!(outbox.lines_for(EntityId(1)), vec!["Your punch misses the rat."]);
    }

    fn missile() -> Action {
        Action::new("magic missile", ActionKind::Spell, DamageType::Energy)
            .with_mana_cost(10)
            .with_hooks(Arc::new(StandardHooks(HookSpec::Spell)))
    }

    fn caster() -> Combatant {
        Combatant::player(EntityId(1), "Ada", 10)
            .with_proficiency("magic missile", 50)
            .with_mana(40, 100)
    }

    #[test]
    fn spell_that_loses_concentration_costs_nothing() {
        let mut ada = caster();
        let mut rat = Combatant::npc(EntityId(2), "the rat", 1);

        // Concentration roll 80 fails 50%; improvement roll 99 misses.
        let mut rng = ScriptedRng::new([80, 99]);
        let (report, outbox) = attack(
            &mut ada,
            &mut rat,
            &missile(),
            false,
            &mut rng,
            &LevelRange::unrestricted(),
        );
        assert_eq!(
            report.outcome,
            AttackOutcome::Failed(ActionFailure::LostConcentration)
        );
        assert_eq!(ada.vitals.mana.current(), 40);
        assert_eq!(outbox.lines_for(EntityId(1)), vec!["You lost your concentration."]);
    }

    #[test]
    fn evaded_spell_keeps_the_casters_mana() {
        let mut ada = caster();
        let mut bryn =
            Combatant::player(EntityId(2), "Bryn", 10).with_proficiency("evasive maneuvers", 100);
        let health = bryn.vitals.health;

        // Concentration 10 < 50, improvement 99 misses, evasion 1 < 100.
        let mut rng = ScriptedRng::new([10, 99, 1]);
        let (report, _) = attack(
            &mut ada,
            &mut bryn,
            &missile(),
            false,
            &mut rng,
            &LevelRange::unrestricted(),
        );
        assert_eq!(report.outcome, AttackOutcome::Defended(DefenseKind::Evasion));
        assert_eq!(ada.vitals.mana.current(), 40);
        assert_eq!(bryn.vitals.health, health);
    }

    #[test]
    fn landed_spell_pays_mana() {
        let mut ada = caster();
        let mut rat = Combatant::npc(EntityId(2), "the rat", 1);

        let mut rng = ScriptedRng::new([10, 99]);
        let (report, _) = attack(
            &mut ada,
            &mut rat,
            &missile(),
            false,
            &mut rng,
            &LevelRange::unrestricted(),
        );
        assert!(report.landed());
        assert_eq!(ada.vitals.mana.current(), 30);
    }

    #[test]
    fn spell_without_mana_fails_before_any_roll() {
        let mut ada = caster().with_mana(5, 100);
        let mut rat = Combatant::npc(EntityId(2), "the rat", 1);

        let mut rng = ScriptedRng::constant(1);
        let (report, outbox) = attack(
            &mut ada,
            &mut rat,
            &missile(),
            false,
            &mut rng,
            &LevelRange::unrestricted(),
        );
        assert_eq!(
            report.outcome,
            AttackOutcome::Failed(ActionFailure::NotEnoughMana)
        );
        assert_eq!(rng.drawn(), 0);
        assert_eq!(ada.vitals.mana.current(), 5);
        assert_eq!(outbox.lines_for(EntityId(1)), vec!["You do not have enough mana."]);
    }

    #[test]
    fn fumbled_swing_may_hint_at_training() {
        let ada = Combatant::player(EntityId(1), "Ada", 3);
        let rat = Combatant::npc(EntityId(2), "the rat", 1);
        let action = Action::weapon_attack(&ada);
        let config = CombatConfig::default();
        let pvp = LevelRange::unrestricted();
        let mut outbox = Outbox::new();
        let mut rng = ScriptedRng::constant(0);
        let report = {
            let mut env = CombatEnv::new(&mut rng, &config, &pvp, &mut outbox);
            untrained_swing(&ada, &rat, &action, &mut env)
        };

        assert_eq!(report.outcome, AttackOutcome::Missed);
        assert_eq!(report.damage, 0);
        assert_eq!(
            outbox.lines_for(EntityId(1)),
            vec![
                "Your punch misses the rat.",
                "You fumble with your punch. Some training in hand to hand would help.",
            ]
        );
    }
}
