//! Runtime orchestration for combat resolution.
//!
//! This crate wires the pure rules of `combat-core` to a shared population,
//! the group and room registries, and the asynchronous messaging, persistence
//! and award collaborators. Consumers embed [`CombatEngine`] and call
//! [`CombatEngine::tick`] on a fixed timer.
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the engine, its builder and the tick scheduler
//! - [`api`] exposes the types downstream clients interact with
//! - [`memory`] provides in-memory collaborators for tests and local runs
//! - [`config`] reads runtime settings from the environment
pub mod api;
pub mod config;
pub mod engine;
pub mod memory;

pub use api::{
    AttackRecord, AwardGranter, CombatError, CorpseSummary, DeathReport, Messenger, Persistence,
    Result, RoundFailure, TickReport,
};
pub use config::RuntimeConfig;
pub use engine::{CombatEngine, CombatEngineBuilder};
pub use memory::{
    InMemoryPopulation, InMemoryRooms, MemoryAwards, MemoryPersistence, RecordingMessenger,
    SystemRng,
};
