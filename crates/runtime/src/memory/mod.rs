//! In-memory collaborator implementations for tests, demos and local runs.

mod population;
mod rng;
mod rooms;
mod services;

pub use population::InMemoryPopulation;
pub use rng::SystemRng;
pub use rooms::InMemoryRooms;
pub use services::{MemoryAwards, MemoryPersistence, RecordingMessenger};
