//! Death sequence: corpse, loot, penalty, retargeting and experience.

use combat_core::death::{
    announce_death, apply_death_penalty, auto_loot, build_corpse, record_kill,
};
use combat_core::progression::{group_share, grant_experience, kill_experience};
use combat_core::{Combatant, EntityId, ExperienceGain, Outbox, RoomId};
use tracing::{debug, info, warn};

use super::CombatEngine;
use crate::api::{CombatError, CorpseSummary, DeathReport, Result};

impl CombatEngine {
    /// Runs everything that follows a lethal hit of `killer` on `victim`.
    ///
    /// The victim's corpse is placed in the room it died in. Player victims
    /// pay the death penalty and stay in the population; NPC victims are
    /// removed.
    pub(crate) fn resolve_death(
        &mut self,
        killer_id: EntityId,
        victim_id: EntityId,
        outbox: &mut Outbox,
    ) -> Result<DeathReport> {
        let clock = self.clock;
        let (killer, victim) = self
            .population
            .pair_mut(killer_id, victim_id)
            .ok_or(CombatError::Vanished {
                id: victim_id,
                tick: clock,
            })?;

        killer.stop_fighting();
        victim.stop_fighting();
        let room = victim.location;
        let victim_name = victim.name.clone();
        announce_death(victim, outbox);

        let award = record_kill(killer, victim, &self.config);
        if let Some(award) = &award {
            outbox.tell(
                killer,
                format!(
                    "You have reached {} kills and earned the {} award (tier {}).",
                    award.threshold, award.kind, award.tier
                ),
            );
        }

        let build = build_corpse(victim, self.rng.as_mut(), &self.config);
        let mut corpse = build.corpse;
        let items = corpse.contents.iter().filter(|i| !i.is_coins()).count();
        let loot = auto_loot(killer, &mut corpse, &self.config, outbox);

        // Experience is computed against the victim as it was at death.
        let fallen = victim.clone();
        let constitution_lost = apply_death_penalty(victim, &self.config, outbox);
        let victim_is_npc = fallen.is_npc();

        let placed = if loot.consumed_corpse() {
            false
        } else {
            match self.rooms.place_corpse(corpse) {
                Ok(()) => true,
                Err(error) => {
                    warn!(
                        target: "combat::death",
                        victim = %victim_id,
                        %room,
                        %error,
                        "corpse could not be placed"
                    );
                    false
                }
            }
        };

        let retargeted = self.retarget_attackers(victim_id, room, outbox);
        let (experience, grouped) = self.propagate_experience(killer_id, &fallen, room, outbox);

        let removed = victim_is_npc && self.population.remove(victim_id).is_some();
        if removed
            && self.groups.group_of(victim_id).is_some()
            && let Ok(group) = self.groups.leave(victim_id)
        {
            debug!(target: "combat::death", victim = %victim_id, %group, "left group on death");
        }

        info!(
            target: "combat::death",
            killer = %killer_id,
            victim = %victim_id,
            %room,
            coins = build.coins,
            grouped,
            removed,
            "combatant died"
        );

        Ok(DeathReport {
            killer: killer_id,
            victim: victim_id,
            victim_name,
            room,
            corpse: CorpseSummary {
                room,
                items,
                coins: build.coins,
                bonus_armor: build.bonus,
                placed,
            },
            loot,
            award,
            experience,
            grouped,
            constitution_lost,
            removed,
            retargeted,
        })
    }

    /// Moves everyone still fighting the victim onto a random surviving
    /// member of the victim's group, or ends their fight.
    fn retarget_attackers(
        &mut self,
        victim_id: EntityId,
        room: RoomId,
        outbox: &mut Outbox,
    ) -> Vec<(EntityId, Option<EntityId>)> {
        let attackers: Vec<EntityId> = self
            .population
            .ids()
            .into_iter()
            .filter(|id| {
                self.population
                    .get(*id)
                    .is_some_and(|c| c.fighting == Some(victim_id))
            })
            .collect();
        if attackers.is_empty() {
            return Vec::new();
        }

        let survivors: Vec<EntityId> = self
            .groups
            .group_members_of(victim_id)
            .into_iter()
            .filter(|id| *id != victim_id)
            .filter(|id| {
                self.population
                    .get(*id)
                    .is_some_and(|c| c.is_alive() && !c.is_ghost() && c.location == room)
            })
            .collect();

        let mut retargeted = Vec::with_capacity(attackers.len());
        for attacker_id in attackers {
            let next = if survivors.is_empty() {
                None
            } else {
                survivors.get(self.rng.pick(survivors.len())).copied()
            };
            let next = next.filter(|target| *target != attacker_id);
            let Some(attacker) = self.population.get_mut(attacker_id) else {
                continue;
            };
            match next {
                Some(target) => {
                    attacker.start_fighting(target);
                    if let Some(name) = self.population.get(target).map(|c| c.name.clone())
                        && let Some(attacker) = self.population.get(attacker_id)
                    {
                        outbox.tell(attacker, format!("You turn to attack {name}!"));
                    }
                }
                None => attacker.stop_fighting(),
            }
            debug!(
                target: "combat::death",
                attacker = %attacker_id,
                next = ?next,
                "attacker retargeted"
            );
            retargeted.push((attacker_id, next));
        }
        retargeted
    }

    /// Grants kill experience to a solo player killer or to each group member
    /// present at the kill.
    ///
    /// Returns the gains and whether the group path was taken.
    fn propagate_experience(
        &mut self,
        killer_id: EntityId,
        victim: &Combatant,
        room: RoomId,
        outbox: &mut Outbox,
    ) -> (Vec<ExperienceGain>, bool) {
        let killer_is_player = self
            .population
            .get(killer_id)
            .is_some_and(Combatant::is_player);
        if !killer_is_player {
            return (Vec::new(), false);
        }

        let members: Vec<EntityId> = self
            .groups
            .group_members_of(killer_id)
            .into_iter()
            .filter(|id| *id != victim.id)
            .filter(|id| {
                self.population
                    .get(*id)
                    .is_some_and(|c| c.is_alive() && c.location == room)
            })
            .collect();
        let grouped = !members.is_empty();
        let recipients = if grouped { members } else { vec![killer_id] };
        let size = recipients.len();
        let modifier = if grouped {
            self.config.group_modifier(size)
        } else {
            1.0
        };

        let mut gains = Vec::with_capacity(size);
        for id in recipients {
            let Some(member) = self.population.get_mut(id) else {
                continue;
            };
            let base = kill_experience(member, victim, self.rng.as_mut(), &self.config);
            let amount = if grouped {
                group_share(base, size, &self.config)
            } else {
                base
            };
            let advance = grant_experience(member, amount, &self.config, outbox);
            if let Some(advance) = &advance {
                info!(
                    target: "combat::death",
                    combatant = %id,
                    from = advance.from,
                    to = advance.to,
                    "level advanced"
                );
            }
            gains.push(ExperienceGain {
                recipient: id,
                amount,
                modifier,
                advance,
            });
        }
        (gains, grouped)
    }
}
