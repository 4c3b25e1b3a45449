//! Vector-backed population registry.

use std::collections::HashMap;

use combat_core::{Combatant, CombatantRegistry, EntityId};

/// Population kept in insertion order with an id index.
///
/// Iteration order is insertion order, which makes tick processing order
/// predictable for tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPopulation {
    combatants: Vec<Combatant>,
    index: HashMap<EntityId, usize>,
}

impl InMemoryPopulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, combatant: Combatant) -> Self {
        self.insert(combatant);
        self
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    fn reindex(&mut self) {
        self.index = self
            .combatants
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.id, slot))
            .collect();
    }
}

impl FromIterator<Combatant> for InMemoryPopulation {
    fn from_iter<I: IntoIterator<Item = Combatant>>(iter: I) -> Self {
        let mut population = Self::new();
        for combatant in iter {
            population.insert(combatant);
        }
        population
    }
}

impl CombatantRegistry for InMemoryPopulation {
    fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.index.get(&id).map(|slot| &self.combatants[*slot])
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        let slot = *self.index.get(&id)?;
        self.combatants.get_mut(slot)
    }

    fn pair_mut(
        &mut self,
        a: EntityId,
        b: EntityId,
    ) -> Option<(&mut Combatant, &mut Combatant)> {
        if a == b {
            return None;
        }
        let first = *self.index.get(&a)?;
        let second = *self.index.get(&b)?;
        if first < second {
            let (left, right) = self.combatants.split_at_mut(second);
            Some((&mut left[first], &mut right[0]))
        } else {
            let (left, right) = self.combatants.split_at_mut(first);
            Some((&mut right[0], &mut left[second]))
        }
    }

    fn find_by_name(&self, name: &str) -> Option<EntityId> {
        let name = name.trim();
        self.combatants
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.id)
    }

    fn ids(&self) -> Vec<EntityId> {
        self.combatants.iter().map(|c| c.id).collect()
    }

    fn insert(&mut self, combatant: Combatant) -> Option<Combatant> {
        match self.index.get(&combatant.id) {
            Some(slot) => Some(std::mem::replace(&mut self.combatants[*slot], combatant)),
            None => {
                self.index.insert(combatant.id, self.combatants.len());
                self.combatants.push(combatant);
                None
            }
        }
    }

    fn remove(&mut self, id: EntityId) -> Option<Combatant> {
        let slot = self.index.remove(&id)?;
        let removed = self.combatants.remove(slot);
        self.reindex();
        Some(removed)
    }
}
