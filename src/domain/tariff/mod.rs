//! Tariff aggregate
//!
//! Rate catalog, legacy compatibility tables, the editable raw tree and the
//! settings store port.

pub mod catalog;
pub mod legacy;
pub mod model;
pub mod repository;
pub mod tree;

pub use catalog::{Catalog, CatalogOptions};
pub use model::{
    City, Destination, Origin, RateItem, RateItemFields, RateValue, Route, RouteKey,
    TransportMode, TransportRates, Unit, Warehouse,
};
pub use repository::SettingsStore;
pub use tree::TariffTree;
