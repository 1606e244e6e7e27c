//! # Freight Tariffs
//!
//! Tariff resolution and estimation for a freight forwarder: origins,
//! destinations, per-route transport rates and the estimates built on them.
//!
//! ## Architecture
//!
//! - **domain**: Catalog, tariff tree, route keys and the store/departure ports
//! - **application**: Catalog snapshots, route resolution, estimation, quotes
//!   and admin editing
//! - **infrastructure**: In-memory and JSON file stores, departure schedule
//! - **shared**: Error types

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod telemetry;

pub use config::{config_path, default_config_path, AppConfig};
pub use telemetry::init_tracing;

pub use application::{
    estimate, CatalogHandle, EstimateRequest, EstimateResult, Quote, QuoteOutcome, QuoteService,
    RouteResolver, TariffAdminService, TariffEngine, TariffTable, TenantEngines,
};
pub use shared::{DomainError, DomainResult, InfraError};
