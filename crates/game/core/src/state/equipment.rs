//! Worn equipment keyed by wear slot.
//!
//! Equipment owns the worn items themselves (not handles), so corpses can take
//! deep copies and armor degradation mutates the worn piece in place.

use std::collections::BTreeMap;

use super::item::{ArmorCategory, Item, WearSlot};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    slots: BTreeMap<WearSlot, Item>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Equips `item` in `slot`, returning whatever was there before.
    pub fn equip(&mut self, slot: WearSlot, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    pub fn unequip(&mut self, slot: WearSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: WearSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn get_mut(&mut self, slot: WearSlot) -> Option<&mut Item> {
        self.slots.get_mut(&slot)
    }

    pub fn wielded(&self) -> Option<&Item> {
        self.get(WearSlot::Wielded)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WearSlot, &Item)> + '_ {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots holding armor that currently absorbs `category`.
    pub fn absorbing_slots(&self, category: ArmorCategory) -> Vec<WearSlot> {
        self.slots
            .iter()
            .filter(|(_, item)| item.absorption(category) > 0)
            .map(|(slot, _)| *slot)
            .collect()
    }

    /// Summed absorption of all worn pieces against `category`.
    pub fn absorption(&self, category: ArmorCategory) -> u32 {
        self.slots
            .values()
            .map(|item| u32::from(item.absorption(category)))
            .sum()
    }

    /// Removes and returns every worn item.
    pub fn drain(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.slots).into_values().collect()
    }
}
