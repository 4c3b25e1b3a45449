//! Player-visible output produced during resolution.
//!
//! Core code never talks to a transport. It appends [`Message`]s here and the
//! runtime flushes them through its messenger once the decision is made.

use crate::state::{Combatant, EntityId, RoomId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    Hit,
    Miss,
    Critical,
    Cast,
    Death,
    LevelUp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    ToPlayer {
        to: EntityId,
        text: String,
    },
    ToRoom {
        room: RoomId,
        exclude: Vec<EntityId>,
        text: String,
    },
    Sound {
        to: EntityId,
        cue: SoundCue,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outbox {
    messages: Vec<Message>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a line for `to` if it is a player; NPCs have no session.
    pub fn tell(&mut self, to: &Combatant, text: impl Into<String>) {
        if to.is_player() {
            self.messages.push(Message::ToPlayer {
                to: to.id,
                text: text.into(),
            });
        }
    }

    /// Queues a line for everyone in `room` except `exclude`.
    pub fn room(&mut self, room: RoomId, exclude: &[EntityId], text: impl Into<String>) {
        self.messages.push(Message::ToRoom {
            room,
            exclude: exclude.to_vec(),
            text: text.into(),
        });
    }

    pub fn sound(&mut self, to: &Combatant, cue: SoundCue) {
        if to.is_player() {
            self.messages.push(Message::Sound { to: to.id, cue });
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, other: Outbox) {
        self.messages.extend(other.messages);
    }

    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Lines queued for one player, in order.
    pub fn lines_for(&self, id: EntityId) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::ToPlayer { to, text } if *to == id => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Lines queued for a room, in order.
    pub fn room_lines(&self, room: RoomId) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::ToRoom { room: r, text, .. } if *r == room => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
