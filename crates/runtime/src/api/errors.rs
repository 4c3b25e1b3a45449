//! Unified error types surfaced by the combat runtime.
//!
//! Wraps failures from registries and the asynchronous collaborators so the
//! scheduler can isolate them per combatant and callers can bubble them up
//! with consistent context.

use combat_core::{EntityId, ErrorSeverity, GameError, GroupError, RoomError, Tick};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CombatError>;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("combat cancelled")]
    Cancelled,

    #[error("combatant {0} is not in the population")]
    UnknownCombatant(EntityId),

    #[error("no action named '{0}'")]
    UnknownAction(String),

    #[error("{attacker} cannot fight {target}: {reason}")]
    InvalidTarget {
        attacker: EntityId,
        target: EntityId,
        reason: &'static str,
    },

    #[error("combatant {id} vanished mid-round at {tick}")]
    Vanished { id: EntityId, tick: Tick },

    #[error("message delivery failed: {0}")]
    Delivery(String),

    #[error("failed to persist {id}: {reason}")]
    Persistence { id: EntityId, reason: String },

    #[error("failed to grant award to {id}: {reason}")]
    Award { id: EntityId, reason: String },

    #[error("failed to load combat content: {0}")]
    Content(String),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Room(#[from] RoomError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled
            | Self::Delivery(_)
            | Self::Persistence { .. }
            | Self::Award { .. } => ErrorSeverity::Recoverable,
            Self::UnknownCombatant(_) | Self::UnknownAction(_) | Self::InvalidTarget { .. } => {
                ErrorSeverity::Validation
            }
            Self::Vanished { .. } => ErrorSeverity::Internal,
            Self::Content(_) => ErrorSeverity::Fatal,
            Self::Group(err) => err.severity(),
            Self::Room(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => "COMBAT_CANCELLED",
            Self::UnknownCombatant(_) => "COMBAT_UNKNOWN_COMBATANT",
            Self::UnknownAction(_) => "COMBAT_UNKNOWN_ACTION",
            Self::InvalidTarget { .. } => "COMBAT_INVALID_TARGET",
            Self::Vanished { .. } => "COMBAT_VANISHED",
            Self::Delivery(_) => "COMBAT_DELIVERY",
            Self::Persistence { .. } => "COMBAT_PERSISTENCE",
            Self::Award { .. } => "COMBAT_AWARD",
            Self::Content(_) => "COMBAT_CONTENT",
            Self::Group(err) => err.error_code(),
            Self::Room(err) => err.error_code(),
        }
    }
}
