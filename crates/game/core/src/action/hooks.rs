//! Hook strategies that give each action its behaviour.
//!
//! The attack pipeline calls hooks in this order: `check` (prerequisites, no
//! side effects), `is_success` (invokable actions only), then once defense and
//! armor have let the attack through `pre_action` (costs), `act` and
//! `post_action`. A failing `check` or `pre_action` leaves no state behind.

use std::fmt;

use super::Action;
use crate::combat::{CombatEnv, SoundCue, check_proficiency};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActiveEffect, Combatant, EffectKind};

/// State an action hook may read and mutate.
pub struct HookContext<'a, 'e> {
    pub attacker: &'a mut Combatant,
    pub target: &'a mut Combatant,
    pub env: &'a mut CombatEnv<'e>,
}

/// Failures surfaced to the player as narrative text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionFailure {
    #[error("You do not have enough mana.")]
    NotEnoughMana,

    #[error("You lost your concentration.")]
    LostConcentration,

    #[error("You don't know how to {0}.")]
    Untrained(String),

    #[error("They aren't here.")]
    NoTarget,
}

impl GameError for ActionFailure {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughMana | Self::LostConcentration => ErrorSeverity::Recoverable,
            Self::Untrained(_) | Self::NoTarget => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughMana => "ACTION_NOT_ENOUGH_MANA",
            Self::LostConcentration => "ACTION_LOST_CONCENTRATION",
            Self::Untrained(_) => "ACTION_UNTRAINED",
            Self::NoTarget => "ACTION_NO_TARGET",
        }
    }
}

pub trait ActionHooks: Send + Sync + fmt::Debug {
    /// Checks prerequisites without changing any state.
    fn check(&self, _action: &Action, _attacker: &Combatant) -> Result<(), ActionFailure> {
        Ok(())
    }

    /// Pays the action's costs once it has got past the target's defenses.
    fn pre_action(
        &self,
        _action: &Action,
        _ctx: &mut HookContext<'_, '_>,
    ) -> Result<(), ActionFailure> {
        Ok(())
    }

    /// Success roll for player-invoked actions.
    fn is_success(&self, action: &Action, ctx: &mut HookContext<'_, '_>) -> bool {
        check_proficiency(ctx.attacker, action.skill_key(), ctx.env)
    }

    /// Side effects of a landed action, before damage is applied.
    fn act(&self, _action: &Action, _ctx: &mut HookContext<'_, '_>) {}

    fn post_action(&self, _action: &Action, _ctx: &mut HookContext<'_, '_>) {}
}

/// Data-selected hook behaviour, as written in the action catalog.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HookSpec {
    /// No side effects beyond damage.
    #[default]
    Plain,
    /// Pays mana and rolls concentration.
    Spell,
    /// A spell that may also afflict the target with a timed effect.
    Affliction {
        effect: EffectKind,
        duration: u32,
        chance: u8,
    },
}

/// The stock hook implementations selected by [`HookSpec`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StandardHooks(pub HookSpec);

impl StandardHooks {
    pub fn plain() -> Self {
        Self(HookSpec::Plain)
    }

    fn pays_mana(&self) -> bool {
        !matches!(self.0, HookSpec::Plain)
    }
}

impl From<HookSpec> for StandardHooks {
    fn from(spec: HookSpec) -> Self {
        Self(spec)
    }
}

impl ActionHooks for StandardHooks {
    fn check(&self, action: &Action, attacker: &Combatant) -> Result<(), ActionFailure> {
        let untrained = action.invokable
            && attacker.is_player()
            && attacker.proficiency(action.skill_key()) == 0;
        if untrained {
            return Err(ActionFailure::Untrained(action.name.clone()));
        }
        if self.pays_mana() && attacker.vitals.mana.current() < action.mana_cost {
            return Err(ActionFailure::NotEnoughMana);
        }
        Ok(())
    }

    fn pre_action(
        &self,
        action: &Action,
        ctx: &mut HookContext<'_, '_>,
    ) -> Result<(), ActionFailure> {
        self.check(action, ctx.attacker)?;
        if self.pays_mana() && !ctx.attacker.vitals.mana.spend(action.mana_cost) {
            return Err(ActionFailure::NotEnoughMana);
        }
        Ok(())
    }

    fn act(&self, action: &Action, ctx: &mut HookContext<'_, '_>) {
        let HookSpec::Affliction {
            effect,
            duration,
            chance,
        } = &self.0
        else {
            return;
        };
        if !ctx.env.rng.chance(u32::from(*chance)) {
            return;
        }
        ctx.target.add_effect(ActiveEffect::new(*effect, *duration));
        let state = affliction_word(*effect);
        ctx.env
            .outbox
            .tell(ctx.target, format!("The {} leaves you {state}!", action.noun));
        ctx.env
            .outbox
            .tell(ctx.attacker, format!("{} is {state}!", ctx.target.name));
    }

    fn post_action(&self, _action: &Action, ctx: &mut HookContext<'_, '_>) {
        if self.pays_mana() {
            ctx.env.outbox.sound(ctx.attacker, SoundCue::Cast);
        }
    }
}

fn affliction_word(effect: EffectKind) -> &'static str {
    match effect {
        EffectKind::Blinded => "blinded",
        EffectKind::Disoriented => "disoriented",
        EffectKind::Ward => "warded",
        EffectKind::Protection => "protected",
        EffectKind::Ghost => "spectral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, DamageType};
    use crate::combat::Outbox;
    use crate::config::CombatConfig;
    use crate::env::{LevelRange, ScriptedRng};
    use crate::state::EntityId;
    use std::sync::Arc;

    fn bolt() -> Action {
        Action::new("lightning bolt", ActionKind::Spell, DamageType::Lightning)
            .with_mana_cost(15)
            .with_hooks(Arc::new(StandardHooks(HookSpec::Spell)))
    }

    #[test]
    fn spell_refuses_without_mana_and_spends_nothing() {
        let mut caster = Combatant::player(EntityId(1), "Ada", 10)
            .with_proficiency("lightning bolt", 80)
            .with_mana(10, 100);
        let mut target = Combatant::npc(EntityId(2), "troll", 10);
        let mut rng = ScriptedRng::constant(1);
        let config = CombatConfig::default();
        let pvp = LevelRange::unrestricted();
        let mut outbox = Outbox::new();
        let mut env = CombatEnv::new(&mut rng, &config, &pvp, &mut outbox);
        let action = bolt();
        let mut ctx = HookContext {
            attacker: &mut caster,
            target: &mut target,
            env: &mut env,
        };

        let err = action.hooks().pre_action(&action, &mut ctx).unwrap_err();
        assert_eq!(err, ActionFailure::NotEnoughMana);
        assert_eq!(err.to_string(), "You do not have enough mana.");
        assert_eq!(caster.vitals.mana.current(), 10);
    }

    #[test]
    fn affliction_applies_effect_on_chance() {
        let mut caster = Combatant::player(EntityId(1), "Ada", 10);
        let mut target = Combatant::npc(EntityId(2), "troll", 10);
        let mut rng = ScriptedRng::new([10]);
        let config = CombatConfig::default();
        let pvp = LevelRange::unrestricted();
        let mut outbox = Outbox::new();
        let mut env = CombatEnv::new(&mut rng, &config, &pvp, &mut outbox);
        let hooks = StandardHooks(HookSpec::Affliction {
            effect: EffectKind::Blinded,
            duration: 3,
            chance: 50,
        });
        let action = Action::new("blindness", ActionKind::Spell, DamageType::Maledictive);
        let mut ctx = HookContext {
            attacker: &mut caster,
            target: &mut target,
            env: &mut env,
        };

        hooks.act(&action, &mut ctx);
        assert!(target.has_effect(EffectKind::Blinded));
        assert!(target.is_impaired());
    }
}
