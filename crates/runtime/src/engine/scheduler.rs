//! Per-tick combat rounds.
//!
//! A tick snapshots the ids flagged fighting, then gives each one a round in
//! registry order. Players drive rounds against whoever they fight; an NPC
//! fighting a player who fights it back acts only through retaliation in that
//! player's round. Every combatant is re-validated when its turn comes, so
//! deaths earlier in the tick are never targeted again.

use combat_core::combat::check_proficiency;
use combat_core::{
    Action, CombatEnv, EntityId, GameError, Outbox, capitalize, health_condition,
    resolve_attack, skills, untrained_swing,
};
use tracing::{debug, info, warn};

use super::CombatEngine;
use crate::api::{AttackRecord, CombatError, DeathReport, Result, RoundFailure, TickReport};

/// What a fighting combatant may do when its turn comes.
enum Readiness {
    /// Not fighting anymore, or gone.
    Idle,
    /// The fight is over; the reason is logged.
    Stop(&'static str),
    /// Acts through its opponent's round instead.
    Retaliates,
    Ready(EntityId),
}

impl CombatEngine {
    /// Runs one combat tick.
    ///
    /// Timed effects expire first, then each fighting combatant gets a round.
    /// A failing round is logged, recorded in the report and skipped;
    /// cancellation aborts the whole tick.
    pub async fn tick(&mut self) -> Result<TickReport> {
        if self.cancel.is_cancelled() {
            return Err(CombatError::Cancelled);
        }
        self.clock = self.clock.next();
        let mut report = TickReport::new(self.clock);
        report.expired = self.expire_effects().await?;

        let fighting = self.population.fighting();
        debug!(
            target: "combat::tick",
            tick = %self.clock,
            fighting = fighting.len(),
            "tick started"
        );

        for id in fighting {
            match self.drive_round(id, &mut report).await {
                Ok(()) => {}
                Err(CombatError::Cancelled) => {
                    warn!(target: "combat::tick", tick = %self.clock, attacker = %id, "tick cancelled");
                    return Err(CombatError::Cancelled);
                }
                Err(error) => {
                    let opponent = self.population.get(id).and_then(|c| c.fighting);
                    warn!(
                        target: "combat::tick",
                        tick = %self.clock,
                        attacker = %id,
                        opponent = ?opponent,
                        code = error.error_code(),
                        %error,
                        "combat round failed; continuing tick"
                    );
                    report.failures.push(RoundFailure {
                        attacker: id,
                        code: error.error_code().to_owned(),
                        message: error.to_string(),
                    });
                }
            }
        }

        if !report.deaths.is_empty() {
            info!(
                target: "combat::tick",
                tick = %self.clock,
                deaths = report.deaths.len(),
                damage = report.total_damage(),
                "tick finished"
            );
        }
        Ok(report)
    }

    async fn drive_round(&mut self, id: EntityId, report: &mut TickReport) -> Result<()> {
        let mut outbox = Outbox::new();
        let deaths = self.round(id, report, &mut outbox)?;
        self.deliver(&mut outbox).await?;
        for death in deaths {
            let settled = self.settle(&death).await;
            report.deaths.push(death);
            settled?;
        }
        Ok(())
    }

    fn readiness(&self, id: EntityId) -> Readiness {
        let Some(attacker) = self.population.get(id) else {
            return Readiness::Idle;
        };
        if !attacker.is_fighting() {
            return Readiness::Idle;
        }
        let Some(target_id) = attacker.fighting else {
            return Readiness::Stop("no target");
        };
        if !attacker.is_alive() {
            return Readiness::Stop("attacker is dead");
        }
        let Some(target) = self.population.get(target_id) else {
            return Readiness::Stop("target is gone");
        };
        if !target.is_alive() {
            return Readiness::Stop("target is dead");
        }
        if target.location != attacker.location {
            return Readiness::Stop("target left the room");
        }
        if attacker.is_npc() && target.is_player() && target.fighting == Some(id) {
            return Readiness::Retaliates;
        }
        Readiness::Ready(target_id)
    }

    /// One round for `id`: its attacks, the target's retaliation and the
    /// condition report.
    fn round(
        &mut self,
        id: EntityId,
        report: &mut TickReport,
        outbox: &mut Outbox,
    ) -> Result<Vec<DeathReport>> {
        let target_id = match self.readiness(id) {
            Readiness::Ready(target) => target,
            Readiness::Idle | Readiness::Retaliates => return Ok(Vec::new()),
            Readiness::Stop(reason) => {
                if let Some(attacker) = self.population.get_mut(id) {
                    attacker.stop_fighting();
                }
                debug!(target: "combat::tick", attacker = %id, reason, "fight stopped");
                return Ok(Vec::new());
            }
        };
        report.rounds += 1;

        if let Some(death) = self.attack_sequence(id, target_id, report, outbox)? {
            return Ok(vec![death]);
        }

        let attacker_is_player = self.population.get(id).is_some_and(|c| c.is_player());
        if attacker_is_player {
            let (retaliates, idle) = match self.population.get(target_id) {
                Some(target) if target.is_npc() && target.is_alive() => (
                    target.is_fighting() && target.fighting == Some(id),
                    target.fighting.is_none(),
                ),
                _ => (false, false),
            };
            if retaliates {
                if let Some(death) = self.attack_sequence(target_id, id, report, outbox)? {
                    return Ok(vec![death]);
                }
            } else if idle && let Some(target) = self.population.get_mut(target_id) {
                target.start_fighting(id);
            }
        }

        self.report_condition(id, target_id, outbox);
        Ok(Vec::new())
    }

    /// Primary attack then the bonus attacks, stopping at a death.
    fn attack_sequence(
        &mut self,
        attacker_id: EntityId,
        target_id: EntityId,
        report: &mut TickReport,
        outbox: &mut Outbox,
    ) -> Result<Option<DeathReport>> {
        let (primary, fumbled) = self.primary_swing(attacker_id, target_id, outbox)?;
        let lethal = primary.report.lethal;
        report.attacks.push(primary);
        if lethal {
            return self.resolve_death(attacker_id, target_id, outbox).map(Some);
        }
        if fumbled {
            return Ok(None);
        }

        for skill in skills::BONUS_ATTACKS {
            if !self.still_engaged(attacker_id, target_id) {
                break;
            }
            let Some(record) = self.bonus_swing(attacker_id, target_id, skill, outbox)? else {
                continue;
            };
            let lethal = record.report.lethal;
            report.attacks.push(record);
            if lethal {
                return self.resolve_death(attacker_id, target_id, outbox).map(Some);
            }
        }
        Ok(None)
    }

    /// The weapon attack. Players below the minimum weapon proficiency swing
    /// harmlessly; the flag reports that case.
    fn primary_swing(
        &mut self,
        attacker_id: EntityId,
        target_id: EntityId,
        outbox: &mut Outbox,
    ) -> Result<(AttackRecord, bool)> {
        let clock = self.clock;
        let (attacker, target) = self
            .population
            .pair_mut(attacker_id, target_id)
            .ok_or(CombatError::Vanished {
                id: target_id,
                tick: clock,
            })?;
        let action = Action::weapon_attack(attacker);
        let fumbled = attacker.is_player()
            && attacker.proficiency(action.skill_key()) < self.config.min_weapon_proficiency;

        let mut env = CombatEnv::new(
            self.rng.as_mut(),
            &self.config,
            self.pvp.as_ref(),
            outbox,
        );
        let report = if fumbled {
            untrained_swing(attacker, target, &action, &mut env)
        } else {
            let critical = env.rng.chance(u32::from(env.config.critical_chance));
            resolve_attack(attacker, target, &action, critical, &mut env)
        };

        let record = AttackRecord {
            attacker: attacker_id,
            target: target_id,
            action: action.name,
            report,
        };
        Ok((record, fumbled))
    }

    /// A bonus attack, attempted only when the attacker is trained in `skill`
    /// and passes its proficiency roll.
    fn bonus_swing(
        &mut self,
        attacker_id: EntityId,
        target_id: EntityId,
        skill: &str,
        outbox: &mut Outbox,
    ) -> Result<Option<AttackRecord>> {
        let clock = self.clock;
        let (attacker, target) = self
            .population
            .pair_mut(attacker_id, target_id)
            .ok_or(CombatError::Vanished {
                id: target_id,
                tick: clock,
            })?;
        if attacker.proficiency(skill) == 0 {
            return Ok(None);
        }

        let mut env = CombatEnv::new(
            self.rng.as_mut(),
            &self.config,
            self.pvp.as_ref(),
            outbox,
        );
        if !check_proficiency(attacker, skill, &mut env) {
            return Ok(None);
        }
        let action = Action::weapon_attack(attacker);
        let critical = env.rng.chance(u32::from(env.config.critical_chance));
        let report = resolve_attack(attacker, target, &action, critical, &mut env);

        Ok(Some(AttackRecord {
            attacker: attacker_id,
            target: target_id,
            action: action.name,
            report,
        }))
    }

    fn still_engaged(&self, attacker_id: EntityId, target_id: EntityId) -> bool {
        let attacker = self.population.get(attacker_id);
        let target = self.population.get(target_id);
        match (attacker, target) {
            (Some(attacker), Some(target)) => {
                attacker.fighting == Some(target_id)
                    && attacker.is_alive()
                    && target.is_alive()
                    && attacker.location == target.location
            }
            _ => false,
        }
    }

    /// Tells a player how their opponent is holding up.
    fn report_condition(&self, attacker_id: EntityId, target_id: EntityId, outbox: &mut Outbox) {
        let (Some(attacker), Some(target)) = (
            self.population.get(attacker_id),
            self.population.get(target_id),
        ) else {
            return;
        };
        if attacker.is_fighting() && target.is_alive() {
            outbox.tell(
                attacker,
                format!("{} {}", capitalize(&target.name), health_condition(target)),
            );
        }
    }
}
