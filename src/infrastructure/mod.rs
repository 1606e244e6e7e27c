//! Infrastructure layer - external concerns

pub mod departures;
pub mod storage;

pub use departures::InMemoryDepartures;
pub use storage::{InMemorySettingsStore, JsonFileSettingsStore};
