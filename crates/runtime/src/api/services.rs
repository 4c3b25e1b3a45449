//! Asynchronous collaborators the engine hands its side effects to.
//!
//! Combat decisions are synchronous; everything that leaves the process
//! (text and sound for sessions, saved characters, granted awards) goes
//! through these traits once a decision is final. Implementations own their
//! own retry policy; the engine only logs failures.

use async_trait::async_trait;
use combat_core::{Award, Combatant, EntityId, RoomId, SoundCue};

use super::errors::Result;

/// Delivers text and sound to player sessions.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends one line to a player.
    async fn send_line(&self, to: EntityId, text: &str) -> Result<()>;

    /// Sends one line to everyone in `room` except the `exclude`d ids.
    async fn send_room(&self, room: RoomId, exclude: &[EntityId], text: &str) -> Result<()>;

    async fn send_sound(&self, to: EntityId, cue: SoundCue) -> Result<()>;
}

/// Saves a combatant's mutated state.
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn save(&self, combatant: &Combatant) -> Result<()>;
}

/// Grants kill-milestone awards to players.
#[async_trait]
pub trait AwardGranter: Send + Sync {
    async fn grant(&self, player: EntityId, award: Award) -> Result<()>;
}
