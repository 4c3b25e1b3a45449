//! Damage calculation.

use crate::action::{Action, DamageType, Dice};
use crate::env::RngOracle;
use crate::state::{Combatant, EffectKind};

/// Raw damage of `action` from `attacker` against `defender`.
///
/// # Formula
///
/// ```text
/// dice   = action dice for spells, else attacker's innate dice (min 1d4)
/// adjust = (attacker.level / defender.level) * action.damage_modifier
/// damage = floor(roll(dice) + adjust)
///
/// if defender is warded or saves against a spell:
///     damage = floor((roll(dice) + adjust) / 2)
/// ```
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    action: &Action,
    rng: &mut dyn RngOracle,
) -> u32 {
    let dice = if action.is_spell() {
        action.dice
    } else {
        Dice::new(attacker.hit_dice.max(1), attacker.damage_dice.max(4))
    };
    let roll = f64::from(dice.roll(rng));
    let adjust =
        f64::from(attacker.level) / f64::from(defender.level.max(1)) * action.damage_modifier;
    let total = roll + adjust;

    let halved = defender.has_effect(EffectKind::Ward)
        || (action.is_spell() && saving_throw(defender, action.damage_type, rng));
    let total = if halved { total / 2.0 } else { total };

    total.floor().max(0.0) as u32
}

/// Spell saving throw. A natural 1 always fails.
pub fn saving_throw(defender: &Combatant, damage_type: DamageType, rng: &mut dyn RngOracle) -> bool {
    let roll = rng.roll_d100();
    if roll == 1 {
        return false;
    }
    roll < u32::from(defender.resistances.against(damage_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::env::{PcgRng, ScriptedRng};
    use crate::state::{ActiveEffect, EntityId, Resistances};

    fn spell() -> Action {
        Action::new("fireball", ActionKind::Spell, DamageType::Energy).with_dice(2, 6)
    }

    fn resistant(level: u32, negative: u8) -> Combatant {
        let mut c = Combatant::npc(EntityId(2), "wraith", level);
        c.resistances = Resistances {
            negative,
            ..Resistances::default()
        };
        c
    }

    #[test]
    fn damage_is_deterministic_and_bounded() {
        let attacker = Combatant::npc(EntityId(1), "ogre", 20).with_dice(3, 8);
        let defender = Combatant::player(EntityId(2), "Ada", 10);
        let action = Action::weapon_attack(&attacker).with_modifier(1.5);
        let bound = 3 * 8 + (20 / 10) * 3 / 2;

        for seed in 0..200 {
            let a = calculate_damage(&attacker, &defender, &action, &mut PcgRng::new(seed));
            let b = calculate_damage(&attacker, &defender, &action, &mut PcgRng::new(seed));
            assert_eq!(a, b);
            assert!(a <= bound, "seed {seed} produced {a}");
        }
    }

    #[test]
    fn innate_dice_have_a_floor() {
        let attacker = Combatant::npc(EntityId(1), "rat", 1).with_dice(0, 1);
        let defender = Combatant::npc(EntityId(2), "rat", 1);
        let action = Action::weapon_attack(&attacker);
        // One d4 showing 4, plus 1/1 adjustment.
        let mut rng = ScriptedRng::constant(4);
        assert_eq!(calculate_damage(&attacker, &defender, &action, &mut rng), 5);
    }

    #[test]
    fn successful_save_halves_spell_damage() {
        let caster = Combatant::player(EntityId(1), "Ada", 10);
        let defender = resistant(10, 50);
        // 6 + 6 dice, +1 adjustment, save roll 30 < 50.
        let mut rng = ScriptedRng::new([6, 6, 30]);
        assert_eq!(calculate_damage(&caster, &defender, &spell(), &mut rng), 6);
    }

    #[test]
    fn natural_one_always_fails_the_save() {
        let caster = Combatant::player(EntityId(1), "Ada", 10);
        let defender = resistant(10, 100);
        let mut rng = ScriptedRng::new([6, 6, 1]);
        assert_eq!(calculate_damage(&caster, &defender, &spell(), &mut rng), 13);
    }

    #[test]
    fn ward_halves_without_a_save_roll() {
        let attacker = Combatant::npc(EntityId(1), "ogre", 10).with_dice(1, 10);
        let mut defender = Combatant::npc(EntityId(2), "priest", 10);
        defender.add_effect(ActiveEffect::new(EffectKind::Ward, 5));
        let action = Action::weapon_attack(&attacker);
        let mut rng = ScriptedRng::new([9]);
        assert_eq!(calculate_damage(&attacker, &defender, &action, &mut rng), 5);
        assert_eq!(rng.drawn(), 1);
    }

    #[test]
    fn weapon_attacks_never_roll_saves() {
        let attacker = Combatant::npc(EntityId(1), "ogre", 10).with_dice(1, 10);
        let defender = resistant(10, 100);
        let action = Action::weapon_attack(&attacker);
        let mut rng = ScriptedRng::new([7]);
        assert_eq!(calculate_damage(&attacker, &defender, &action, &mut rng), 8);
        assert_eq!(rng.drawn(), 1);
    }
}
