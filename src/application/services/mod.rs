//! Application services

mod estimator;
mod quote;
mod resolver;
mod tariff_admin;

pub use estimator::{estimate, EstimateResult, MissingMeasure};
pub use quote::{resolve_quote, EstimateRequest, Quote, QuoteOutcome, QuoteService, Unavailability};
pub use resolver::{RouteResolver, TransportOption};
pub use tariff_admin::TariffAdminService;
