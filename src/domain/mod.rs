pub mod departure;
pub mod tariff;

// Re-export commonly used types
pub use departure::{Departure, DeparturesService};
pub use tariff::{
    Catalog, CatalogOptions, City, Destination, Origin, RateItem, Route, RouteKey, SettingsStore,
    TariffTree, TransportMode, TransportRates, Unit, Warehouse,
};

pub use crate::shared::errors::{DomainError, DomainResult};
