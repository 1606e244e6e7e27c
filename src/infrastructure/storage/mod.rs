//! Tariff tree storage backends

mod file;
mod memory;

pub use file::JsonFileSettingsStore;
pub use memory::InMemorySettingsStore;
