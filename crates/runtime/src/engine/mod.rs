//! Combat engine orchestrator.
//!
//! [`CombatEngine`] owns the registries, the RNG and the combat tables and is
//! the only writer of combat state. Decisions run synchronously against the
//! owned registries; their output is collected in an [`Outbox`] and handed to
//! the asynchronous collaborators afterwards.
//!
//! - [`scheduler`] drives the per-tick rounds
//! - [`death`] resolves deaths and experience
//! - [`delivery`] flushes messages, awards and saves

mod death;
mod delivery;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use combat_content::{ActionBook, TablesLoader};
use combat_core::{
    Action, ActionRegistry, CombatConfig, CombatEnv, CombatFlags, CombatantRegistry, EffectKind,
    EntityId, GroupBook, GroupRegistry, Outbox, PvpPolicy, RngOracle, RoomRegistry, Tick,
    capitalize, resolve_attack,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{
    AttackRecord, AwardGranter, CombatError, DeathReport, Messenger, Persistence, Result,
};
use crate::config::RuntimeConfig;
use crate::memory::{
    InMemoryPopulation, InMemoryRooms, MemoryAwards, MemoryPersistence, RecordingMessenger,
    SystemRng,
};

/// Owns combat state and resolves fights.
pub struct CombatEngine {
    population: Box<dyn CombatantRegistry>,
    groups: Box<dyn GroupRegistry>,
    rooms: Box<dyn RoomRegistry>,
    actions: Arc<dyn ActionRegistry>,
    pvp: Box<dyn PvpPolicy>,
    rng: Box<dyn RngOracle>,
    messenger: Arc<dyn Messenger>,
    persistence: Arc<dyn Persistence>,
    awards: Arc<dyn AwardGranter>,
    config: CombatConfig,
    cancel: CancellationToken,
    clock: Tick,
}

impl CombatEngine {
    /// Create a new engine builder
    pub fn builder() -> CombatEngineBuilder {
        CombatEngineBuilder::new()
    }

    /// Number of ticks run so far.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn population(&self) -> &dyn CombatantRegistry {
        self.population.as_ref()
    }

    /// Direct population access for spawning, movement and other systems
    /// outside combat.
    pub fn population_mut(&mut self) -> &mut dyn CombatantRegistry {
        self.population.as_mut()
    }

    pub fn groups(&self) -> &dyn GroupRegistry {
        self.groups.as_ref()
    }

    pub fn groups_mut(&mut self) -> &mut dyn GroupRegistry {
        self.groups.as_mut()
    }

    pub fn actions(&self) -> &dyn ActionRegistry {
        self.actions.as_ref()
    }

    /// Token that aborts the current and every later tick once cancelled.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// True while anyone is still flagged fighting.
    pub fn has_fights(&self) -> bool {
        !self.population.fighting().is_empty()
    }

    /// Starts a fight: `attacker` targets `target`, and an idle target fights
    /// back.
    pub async fn engage(&mut self, attacker: EntityId, target: EntityId) -> Result<()> {
        let mut outbox = Outbox::new();
        let engaged = self.engage_pair(attacker, target, &mut outbox);
        self.deliver(&mut outbox).await?;
        engaged
    }

    /// Ends `id`'s fight and releases everyone fighting it.
    ///
    /// Returns the released attackers.
    pub async fn disengage(&mut self, id: EntityId) -> Result<Vec<EntityId>> {
        let mut outbox = Outbox::new();
        let combatant = self
            .population
            .get_mut(id)
            .ok_or(CombatError::UnknownCombatant(id))?;
        combatant.stop_fighting();
        outbox.tell(combatant, "You stop fighting.");

        let released: Vec<EntityId> = self
            .population
            .ids()
            .into_iter()
            .filter(|other| {
                self.population
                    .get(*other)
                    .is_some_and(|c| c.fighting == Some(id))
            })
            .collect();
        for other in &released {
            if let Some(c) = self.population.get_mut(*other) {
                c.stop_fighting();
            }
        }

        debug!(target: "combat::tick", combatant = %id, released = released.len(), "disengaged");
        self.deliver(&mut outbox).await?;
        Ok(released)
    }

    /// Performs a named skill or spell against `target` outside the tick.
    ///
    /// The attack also engages both sides. A lethal result runs the full death
    /// sequence before returning.
    pub async fn attack(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        action: &str,
    ) -> Result<(AttackRecord, Option<DeathReport>)> {
        let action = self
            .actions
            .resolve(action)
            .ok_or_else(|| CombatError::UnknownAction(action.to_owned()))?;

        let mut outbox = Outbox::new();
        if let Err(error) = self.engage_pair(attacker, target, &mut outbox) {
            self.deliver(&mut outbox).await?;
            return Err(error);
        }

        let record = self.swing(attacker, target, &action, false, &mut outbox)?;
        let death = if record.report.lethal {
            Some(self.resolve_death(attacker, target, &mut outbox)?)
        } else {
            None
        };

        self.deliver(&mut outbox).await?;
        if let Some(death) = &death {
            self.settle(death).await?;
        }
        Ok((record, death))
    }

    /// Counts every timed effect down one tick.
    ///
    /// Runs at the start of each tick; a lapsed ghost effect also clears the
    /// ghost flag.
    pub async fn expire_effects(&mut self) -> Result<Vec<(EntityId, EffectKind)>> {
        let mut outbox = Outbox::new();
        let mut expired = Vec::new();
        for id in self.population.ids() {
            let Some(combatant) = self.population.get_mut(id) else {
                continue;
            };
            for kind in combatant.effects.advance() {
                if kind == EffectKind::Ghost {
                    combatant.flags.remove(CombatFlags::GHOST);
                }
                outbox.tell(combatant, expiry_line(kind));
                expired.push((id, kind));
            }
        }
        self.deliver(&mut outbox).await?;
        Ok(expired)
    }

    fn engage_pair(
        &mut self,
        attacker_id: EntityId,
        target_id: EntityId,
        outbox: &mut Outbox,
    ) -> Result<()> {
        let invalid = |reason| CombatError::InvalidTarget {
            attacker: attacker_id,
            target: target_id,
            reason,
        };
        if attacker_id == target_id {
            return Err(invalid("cannot attack yourself"));
        }
        for id in [attacker_id, target_id] {
            if self.population.get(id).is_none() {
                return Err(CombatError::UnknownCombatant(id));
            }
        }
        let Some((attacker, target)) = self.population.pair_mut(attacker_id, target_id) else {
            return Err(CombatError::UnknownCombatant(target_id));
        };

        if !attacker.is_alive() || !target.is_alive() {
            return Err(invalid("one side is already dead"));
        }
        if attacker.is_ghost() || target.is_ghost() {
            return Err(invalid("ghosts cannot fight"));
        }
        if attacker.location != target.location {
            return Err(invalid("not in the same room"));
        }
        if !self.pvp.permits(attacker, target) {
            outbox.tell(
                attacker,
                format!("{} is beyond your fighting range.", capitalize(&target.name)),
            );
            return Err(invalid("outside the permitted level range"));
        }

        if attacker.fighting != Some(target_id) {
            attacker.start_fighting(target_id);
            outbox.tell(attacker, format!("You attack {}!", target.name));
            outbox.tell(target, format!("{} attacks you!", capitalize(&attacker.name)));
        }
        if target.fighting.is_none() {
            target.start_fighting(attacker_id);
        }
        Ok(())
    }

    /// Resolves one attempt of `action`; the pair must exist.
    fn swing(
        &mut self,
        attacker_id: EntityId,
        target_id: EntityId,
        action: &Action,
        critical: bool,
        outbox: &mut Outbox,
    ) -> Result<AttackRecord> {
        let clock = self.clock;
        let (attacker, target) = self
            .population
            .pair_mut(attacker_id, target_id)
            .ok_or(CombatError::Vanished {
                id: target_id,
                tick: clock,
            })?;
        let mut env = CombatEnv::new(
            self.rng.as_mut(),
            &self.config,
            self.pvp.as_ref(),
            outbox,
        );
        let report = resolve_attack(attacker, target, action, critical, &mut env);
        Ok(AttackRecord {
            attacker: attacker_id,
            target: target_id,
            action: action.name.clone(),
            report,
        })
    }
}

fn expiry_line(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::Ward => "Your ward fades away.",
        EffectKind::Protection => "You feel less protected.",
        EffectKind::Blinded => "You can see again.",
        EffectKind::Disoriented => "Your head clears.",
        EffectKind::Ghost => "Your body becomes solid once more.",
    }
}

/// Builder for [`CombatEngine`].
///
/// Every collaborator has an in-memory default, so tests only supply what
/// they inspect.
#[derive(Default)]
pub struct CombatEngineBuilder {
    config: Option<CombatConfig>,
    tables_path: Option<PathBuf>,
    population: Option<Box<dyn CombatantRegistry>>,
    groups: Option<Box<dyn GroupRegistry>>,
    rooms: Option<Box<dyn RoomRegistry>>,
    actions: Option<Arc<dyn ActionRegistry>>,
    pvp: Option<Box<dyn PvpPolicy>>,
    rng: Option<Box<dyn RngOracle>>,
    messenger: Option<Arc<dyn Messenger>>,
    persistence: Option<Arc<dyn Persistence>>,
    awards: Option<Arc<dyn AwardGranter>>,
    cancel: Option<CancellationToken>,
}

impl CombatEngineBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Applies environment-derived settings: PvP range, RNG seed and tables.
    pub fn runtime_config(mut self, config: &RuntimeConfig) -> Self {
        self.pvp = Some(Box::new(config.pvp_policy()));
        self.rng = Some(Box::new(SystemRng::from_seed(config.seed)));
        self.tables_path = config.tables_path.clone();
        self
    }

    /// Override the combat tables. Takes precedence over a tables path.
    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn population(mut self, population: impl CombatantRegistry + 'static) -> Self {
        self.population = Some(Box::new(population));
        self
    }

    pub fn groups(mut self, groups: impl GroupRegistry + 'static) -> Self {
        self.groups = Some(Box::new(groups));
        self
    }

    pub fn rooms(mut self, rooms: impl RoomRegistry + 'static) -> Self {
        self.rooms = Some(Box::new(rooms));
        self
    }

    /// Set the action catalog (default: the embedded catalog)
    pub fn actions(mut self, actions: Arc<dyn ActionRegistry>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn pvp(mut self, pvp: impl PvpPolicy + 'static) -> Self {
        self.pvp = Some(Box::new(pvp));
        self
    }

    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    pub fn persistence(mut self, persistence: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn awards(mut self, awards: Arc<dyn AwardGranter>) -> Self {
        self.awards = Some(awards);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<CombatEngine> {
        let config = match (self.config, self.tables_path) {
            (Some(config), _) => config,
            (None, Some(path)) => {
                let config = TablesLoader::load(&path)
                    .map_err(|e| CombatError::Content(format!("{e:#}")))?;
                info!(target: "combat::tick", path = %path.display(), "combat tables loaded");
                config
            }
            (None, None) => CombatConfig::default(),
        };

        let actions = match self.actions {
            Some(actions) => actions,
            None => Arc::new(
                ActionBook::load().map_err(|e| CombatError::Content(format!("{e:#}")))?,
            ),
        };

        Ok(CombatEngine {
            population: self
                .population
                .unwrap_or_else(|| Box::new(InMemoryPopulation::new())),
            groups: self.groups.unwrap_or_else(|| Box::new(GroupBook::new())),
            rooms: self.rooms.unwrap_or_else(|| Box::new(InMemoryRooms::new())),
            actions,
            pvp: self
                .pvp
                .unwrap_or_else(|| Box::new(combat_core::LevelRange::default())),
            rng: self
                .rng
                .unwrap_or_else(|| Box::new(SystemRng::from_entropy())),
            messenger: self
                .messenger
                .unwrap_or_else(|| Arc::new(RecordingMessenger::new())),
            persistence: self
                .persistence
                .unwrap_or_else(|| Arc::new(MemoryPersistence::new())),
            awards: self.awards.unwrap_or_else(|| Arc::new(MemoryAwards::new())),
            config,
            cancel: self.cancel.unwrap_or_default(),
            clock: Tick::ZERO,
        })
    }
}
