//! Kill groups and the in-memory group book.
//!
//! A [`GroupBook`] is the single source of truth for group membership: a
//! combatant belongs to at most one group, the owner is always a member, and a
//! group whose member list empties is deleted.

use std::collections::BTreeMap;
use std::fmt;

use super::EntityId;
use crate::env::GroupRegistry;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub id: GroupId,
    pub owner: EntityId,
    /// Members in join order; the owner is always present.
    pub members: Vec<EntityId>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("{member} already belongs to {group}")]
    AlreadyGrouped { member: EntityId, group: GroupId },

    #[error("{0} is not in a group")]
    NotGrouped(EntityId),

    #[error("{0} does not exist")]
    UnknownGroup(GroupId),
}

impl GameError for GroupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyGrouped { .. } | Self::NotGrouped(_) => ErrorSeverity::Validation,
            Self::UnknownGroup(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyGrouped { .. } => "GROUP_ALREADY_GROUPED",
            Self::NotGrouped(_) => "GROUP_NOT_GROUPED",
            Self::UnknownGroup(_) => "GROUP_UNKNOWN",
        }
    }
}

/// Group registry backed by ordered maps.
#[derive(Clone, Debug, Default)]
pub struct GroupBook {
    groups: BTreeMap<GroupId, Group>,
    membership: BTreeMap<EntityId, GroupId>,
    next_id: u32,
}

impl GroupBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group: GroupId) -> Option<&Group> {
        self.groups.get(&group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl GroupRegistry for GroupBook {
    fn group_of(&self, member: EntityId) -> Option<GroupId> {
        self.membership.get(&member).copied()
    }

    fn members(&self, group: GroupId) -> Vec<EntityId> {
        self.groups
            .get(&group)
            .map(|g| g.members.clone())
            .unwrap_or_default()
    }

    fn owner(&self, group: GroupId) -> Option<EntityId> {
        self.groups.get(&group).map(|g| g.owner)
    }

    fn owned_by(&self, owner: EntityId) -> Option<GroupId> {
        self.group_of(owner)
            .filter(|group| self.owner(*group) == Some(owner))
    }

    fn create(&mut self, owner: EntityId) -> Result<GroupId, GroupError> {
        if let Some(group) = self.group_of(owner) {
            return Err(GroupError::AlreadyGrouped {
                member: owner,
                group,
            });
        }
        self.next_id += 1;
        let id = GroupId(self.next_id);
        self.groups.insert(
            id,
            Group {
                id,
                owner,
                members: vec![owner],
            },
        );
        self.membership.insert(owner, id);
        Ok(id)
    }

    fn join(&mut self, group: GroupId, member: EntityId) -> Result<(), GroupError> {
        if let Some(existing) = self.group_of(member) {
            return Err(GroupError::AlreadyGrouped {
                member,
                group: existing,
            });
        }
        let entry = self
            .groups
            .get_mut(&group)
            .ok_or(GroupError::UnknownGroup(group))?;
        entry.members.push(member);
        self.membership.insert(member, group);
        Ok(())
    }

    fn leave(&mut self, member: EntityId) -> Result<GroupId, GroupError> {
        let group = self
            .membership
            .remove(&member)
            .ok_or(GroupError::NotGrouped(member))?;
        let entry = self
            .groups
            .get_mut(&group)
            .ok_or(GroupError::UnknownGroup(group))?;
        entry.members.retain(|m| *m != member);
        match entry.members.first() {
            None => {
                self.groups.remove(&group);
            }
            Some(next) if entry.owner == member => entry.owner = *next,
            Some(_) => {}
        }
        Ok(group)
    }

    fn disband(&mut self, group: GroupId) -> Result<Vec<EntityId>, GroupError> {
        let entry = self
            .groups
            .remove(&group)
            .ok_or(GroupError::UnknownGroup(group))?;
        for member in &entry.members {
            self.membership.remove(member);
        }
        Ok(entry.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_first_member() {
        let mut book = GroupBook::new();
        let group = book.create(EntityId(1)).unwrap();
        book.join(group, EntityId(2)).unwrap();

        assert_eq!(book.members(group), vec![EntityId(1), EntityId(2)]);
        assert_eq!(book.owned_by(EntityId(1)), Some(group));
        assert_eq!(book.owned_by(EntityId(2)), None);
        assert!(book.is_owner(EntityId(1)));
    }

    #[test]
    fn member_cannot_join_two_groups() {
        let mut book = GroupBook::new();
        let a = book.create(EntityId(1)).unwrap();
        let b = book.create(EntityId(2)).unwrap();
        book.join(a, EntityId(3)).unwrap();

        let err = book.join(b, EntityId(3)).unwrap_err();
        assert_eq!(
            err,
            GroupError::AlreadyGrouped {
                member: EntityId(3),
                group: a
            }
        );
    }

    #[test]
    fn ownership_passes_when_owner_leaves() {
        let mut book = GroupBook::new();
        let group = book.create(EntityId(1)).unwrap();
        book.join(group, EntityId(2)).unwrap();

        book.leave(EntityId(1)).unwrap();
        assert_eq!(book.owner(group), Some(EntityId(2)));
        assert_eq!(book.group_of(EntityId(1)), None);
    }

    #[test]
    fn empty_group_is_deleted() {
        let mut book = GroupBook::new();
        let group = book.create(EntityId(1)).unwrap();
        book.leave(EntityId(1)).unwrap();

        assert!(book.get(group).is_none());
        assert!(book.is_empty());
        assert_eq!(book.leave(EntityId(1)), Err(GroupError::NotGrouped(EntityId(1))));
    }

    #[test]
    fn disband_releases_everyone() {
        let mut book = GroupBook::new();
        let group = book.create(EntityId(1)).unwrap();
        book.join(group, EntityId(2)).unwrap();

        let released = book.disband(group).unwrap();
        assert_eq!(released.len(), 2);
        assert_eq!(book.group_of(EntityId(2)), None);
        assert_eq!(book.disband(group), Err(GroupError::UnknownGroup(group)));
    }
}
