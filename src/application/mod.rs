pub mod catalog;
pub mod dto;
pub mod services;

// Re-export key types for convenience
pub use catalog::{CatalogHandle, SharedTenantEngines, TariffEngine, TenantEngines};
pub use dto::TariffTable;
pub use services::{
    estimate, resolve_quote, EstimateRequest, EstimateResult, MissingMeasure, Quote, QuoteOutcome,
    QuoteService, RouteResolver, TariffAdminService, TransportOption, Unavailability,
};
