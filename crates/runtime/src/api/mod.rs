//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the engine can stay focused on orchestration.

pub mod errors;
pub mod reports;
pub mod services;

pub use errors::{CombatError, Result};
pub use reports::{AttackRecord, CorpseSummary, DeathReport, RoundFailure, TickReport};
pub use services::{AwardGranter, Messenger, Persistence};
