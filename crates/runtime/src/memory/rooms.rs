//! Shared in-memory room contents.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use combat_core::{Corpse, RoomError, RoomId, RoomRegistry};

#[derive(Debug, Default)]
struct RoomStore {
    /// When set, corpses may only be placed in these rooms.
    known: Option<BTreeSet<RoomId>>,
    corpses: BTreeMap<RoomId, Vec<Corpse>>,
}

/// Room registry whose clones share one store, so a caller can keep a handle
/// while the engine owns another.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRooms {
    store: Arc<RwLock<RoomStore>>,
}

impl InMemoryRooms {
    /// A world where every room exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// A world with only the listed rooms.
    pub fn with_rooms(rooms: impl IntoIterator<Item = RoomId>) -> Self {
        let store = RoomStore {
            known: Some(rooms.into_iter().collect()),
            corpses: BTreeMap::new(),
        };
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn corpses_in(&self, room: RoomId) -> Vec<Corpse> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store.corpses.get(&room).cloned().unwrap_or_default()
    }

    pub fn corpse_count(&self) -> usize {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store.corpses.values().map(Vec::len).sum()
    }

    /// Counts every corpse down one tick and removes the ones that rot away.
    pub fn decay(&self) -> Vec<Corpse> {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let mut rotted = Vec::new();
        for corpses in store.corpses.values_mut() {
            for corpse in corpses.iter_mut() {
                corpse.decay_ticks = corpse.decay_ticks.saturating_sub(1);
            }
            let (gone, kept): (Vec<_>, Vec<_>) =
                corpses.drain(..).partition(|c| c.decay_ticks == 0);
            *corpses = kept;
            rotted.extend(gone);
        }
        store.corpses.retain(|_, corpses| !corpses.is_empty());
        rotted
    }
}

impl RoomRegistry for InMemoryRooms {
    fn place_corpse(&mut self, corpse: Corpse) -> Result<(), RoomError> {
        let mut store = self.store.write().map_err(|_| RoomError::Rejected {
            room: corpse.room,
            reason: "room store lock poisoned".to_owned(),
        })?;
        if let Some(known) = &store.known
            && !known.contains(&corpse.room)
        {
            return Err(RoomError::UnknownRoom(corpse.room));
        }
        store.corpses.entry(corpse.room).or_default().push(corpse);
        Ok(())
    }
}
