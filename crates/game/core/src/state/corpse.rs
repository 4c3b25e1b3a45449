use super::item::Item;
use super::{EntityId, RoomId};
use crate::error::{ErrorSeverity, GameError};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CorpseKind {
    Player,
    Npc,
}

/// Container left behind when a combatant dies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corpse {
    pub name: String,
    pub kind: CorpseKind,
    /// The combatant whose body this was.
    pub owner: EntityId,
    pub room: RoomId,
    pub level: u32,
    pub contents: Vec<Item>,
    /// Ticks until the room's decay sweep removes it.
    pub decay_ticks: u32,
}

impl Corpse {
    pub fn is_npc_corpse(&self) -> bool {
        self.kind == CorpseKind::Npc
    }

    /// Sum of all coin piles inside.
    pub fn coin_total(&self) -> u64 {
        self.contents.iter().map(Item::coin_value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("{0} does not exist")]
    UnknownRoom(RoomId),

    #[error("{room} refused the corpse: {reason}")]
    Rejected { room: RoomId, reason: String },
}

impl GameError for RoomError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownRoom(_) => ErrorSeverity::Internal,
            Self::Rejected { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownRoom(_) => "ROOM_UNKNOWN",
            Self::Rejected { .. } => "ROOM_REJECTED",
        }
    }
}
