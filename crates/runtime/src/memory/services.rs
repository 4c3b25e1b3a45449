//! Recording implementations of the asynchronous collaborators.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use combat_core::{Award, Combatant, EntityId, Message, RoomId, SoundCue};

use crate::api::{AwardGranter, CombatError, Messenger, Persistence, Result};

/// Messenger that keeps every delivered message in order.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    log: RwLock<Vec<Message>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines delivered to one player, in order.
    pub fn lines_for(&self, id: EntityId) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::ToPlayer { to, text } if to == id => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Lines delivered to a room, in order.
    pub fn room_lines(&self, room: RoomId) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::ToRoom { room: r, text, .. } if r == room => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn sounds_for(&self, id: EntityId) -> Vec<SoundCue> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::Sound { to, cue } if to == id => Some(cue),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, message: Message) -> Result<()> {
        self.log
            .write()
            .map_err(|_| CombatError::Delivery("message log lock poisoned".into()))?
            .push(message);
        Ok(())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_line(&self, to: EntityId, text: &str) -> Result<()> {
        self.record(Message::ToPlayer {
            to,
            text: text.to_owned(),
        })
    }

    async fn send_room(&self, room: RoomId, exclude: &[EntityId], text: &str) -> Result<()> {
        self.record(Message::ToRoom {
            room,
            exclude: exclude.to_vec(),
            text: text.to_owned(),
        })
    }

    async fn send_sound(&self, to: EntityId, cue: SoundCue) -> Result<()> {
        self.record(Message::Sound { to, cue })
    }
}

/// Persistence that keeps the latest saved copy of each combatant.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: RwLock<BTreeMap<EntityId, Combatant>>,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, id: EntityId) -> Option<Combatant> {
        self.saved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Total number of saves, counting repeats.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn save(&self, combatant: &Combatant) -> Result<()> {
        self.saved
            .write()
            .map_err(|_| CombatError::Persistence {
                id: combatant.id,
                reason: "store lock poisoned".into(),
            })?
            .insert(combatant.id, combatant.clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Award granter that records every grant.
#[derive(Debug, Default)]
pub struct MemoryAwards {
    granted: RwLock<Vec<(EntityId, Award)>>,
}

impl MemoryAwards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted(&self) -> Vec<(EntityId, Award)> {
        self.granted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AwardGranter for MemoryAwards {
    async fn grant(&self, player: EntityId, award: Award) -> Result<()> {
        self.granted
            .write()
            .map_err(|_| CombatError::Award {
                id: player,
                reason: "award log lock poisoned".into(),
            })?
            .push((player, award));
        Ok(())
    }
}
