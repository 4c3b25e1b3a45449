//! Collaborator contracts consumed by the combat rules.
//!
//! The rules never reach for global state. Everything they read or mutate
//! outside the two combatants of an attack comes through one of these traits,
//! which the runtime wires to concrete implementations.
mod pvp;
mod rng;

pub use pvp::{LevelRange, PvpPolicy};
pub use rng::{PcgRng, RngOracle, ScriptedRng};

use crate::action::Action;
use crate::state::{Combatant, Corpse, EntityId, GroupError, GroupId, RoomError, RoomId};

/// Shared population of living combatants.
///
/// Iteration order is stable and is the order in which a tick processes
/// attackers.
pub trait CombatantRegistry: Send + Sync {
    fn get(&self, id: EntityId) -> Option<&Combatant>;

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant>;

    /// Mutable access to two distinct combatants at once.
    ///
    /// Returns `None` when either is missing or `a == b`.
    fn pair_mut(&mut self, a: EntityId, b: EntityId)
    -> Option<(&mut Combatant, &mut Combatant)>;

    /// Case-insensitive lookup by name.
    fn find_by_name(&self, name: &str) -> Option<EntityId>;

    /// Ids of every combatant in iteration order.
    fn ids(&self) -> Vec<EntityId>;

    /// Snapshot of combatants currently flagged fighting, in iteration order.
    fn fighting(&self) -> Vec<EntityId> {
        self.ids()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(Combatant::is_fighting))
            .collect()
    }

    fn location_of(&self, id: EntityId) -> Option<RoomId> {
        self.get(id).map(|c| c.location)
    }

    /// Inserts or replaces a combatant, returning the previous entry.
    fn insert(&mut self, combatant: Combatant) -> Option<Combatant>;

    fn remove(&mut self, id: EntityId) -> Option<Combatant>;
}

/// Group membership store.
pub trait GroupRegistry: Send + Sync {
    fn group_of(&self, member: EntityId) -> Option<GroupId>;

    /// Members of a group in join order; empty for unknown groups.
    fn members(&self, group: GroupId) -> Vec<EntityId>;

    fn owner(&self, group: GroupId) -> Option<EntityId>;

    /// Group owned by `owner`, if any.
    fn owned_by(&self, owner: EntityId) -> Option<GroupId>;

    fn is_owner(&self, id: EntityId) -> bool {
        self.owned_by(id).is_some()
    }

    /// Members of whatever group `member` belongs to.
    fn group_members_of(&self, member: EntityId) -> Vec<EntityId> {
        self.group_of(member)
            .map(|group| self.members(group))
            .unwrap_or_default()
    }

    fn create(&mut self, owner: EntityId) -> Result<GroupId, GroupError>;

    fn join(&mut self, group: GroupId, member: EntityId) -> Result<(), GroupError>;

    /// Removes `member` from its group, passing ownership on and deleting the
    /// group once empty.
    fn leave(&mut self, member: EntityId) -> Result<GroupId, GroupError>;

    /// Deletes a group, returning the released members.
    fn disband(&mut self, group: GroupId) -> Result<Vec<EntityId>, GroupError>;
}

/// Room contents the combat engine writes to.
pub trait RoomRegistry: Send + Sync {
    fn place_corpse(&mut self, corpse: Corpse) -> Result<(), RoomError>;
}

/// Builds actions by stable name.
pub trait ActionRegistry: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Action>;

    fn names(&self) -> Vec<String>;
}
