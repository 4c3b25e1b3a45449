//! Data-driven combat content and loaders.
//!
//! This crate houses the static combat content and the loaders for it:
//! - Skill and spell catalog (data-driven via RON)
//! - Combat tables (data-driven via TOML)
//!
//! Content is consumed by the runtime as collaborator implementations and
//! never appears in combatant state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ActionBook, ActionSpec, LoadResult, TablesLoader};
