//! Route resolver: "what is available" queries over a catalog snapshot
//!
//! Every query is total: missing or empty codes, unknown routes and unsold
//! package types come back as empty results or `None`, never as errors.
//! Callers never build or parse route key strings themselves.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::domain::tariff::{
    Catalog, City, Destination, Origin, RateItem, Route, RouteKey, TransportMode, TransportRates,
    Unit, Warehouse,
};

/// Transport offered on a route, annotated for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportOption {
    pub mode: TransportMode,
    pub label: &'static str,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct RouteResolver {
    catalog: Arc<Catalog>,
}

impl RouteResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn origins(&self) -> &[Origin] {
        self.catalog.origins()
    }

    pub fn destinations(&self) -> &[Destination] {
        self.catalog.destinations()
    }

    pub fn origin(&self, code: &str) -> Option<&Origin> {
        self.catalog.origin(code)
    }

    pub fn destination(&self, code: &str) -> Option<&Destination> {
        self.catalog.destination(code)
    }

    pub fn cities(&self, origin: &str) -> &[City] {
        self.origin(origin).map(|o| o.cities.as_slice()).unwrap_or_default()
    }

    pub fn warehouses(&self, destination: &str) -> &[Warehouse] {
        self.destination(destination)
            .map(|d| d.warehouses.as_slice())
            .unwrap_or_default()
    }

    /// Destination codes reachable from `origin`, in route order
    pub fn routes_from(&self, origin: &str) -> Vec<&str> {
        self.catalog
            .routes()
            .iter()
            .filter(|route| route.key.origin == origin)
            .map(|route| route.key.destination.as_str())
            .collect()
    }

    pub fn route(&self, origin: &str, destination: &str) -> Option<&Route> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return None;
        }
        self.catalog.route(&RouteKey::new(origin, destination))
    }

    /// Transports configured on the route, in the order the admin entered them
    pub fn available_transports(&self, origin: &str, destination: &str) -> Vec<TransportOption> {
        let Some(route) = self.route(origin, destination) else {
            debug!(origin, destination, "No route configured");
            return Vec::new();
        };
        route
            .transports
            .iter()
            .map(|rates| TransportOption {
                mode: rates.mode,
                label: rates.mode.label(),
                currency: rates.currency.clone(),
            })
            .collect()
    }

    pub fn transport_rates(
        &self,
        transport: TransportMode,
        origin: &str,
        destination: &str,
    ) -> Option<&TransportRates> {
        self.route(origin, destination)?.transport(transport)
    }

    /// Package types sold for the transport on the route
    pub fn available_package_types(
        &self,
        transport: TransportMode,
        origin: &str,
        destination: &str,
    ) -> Vec<RateItem> {
        self.transport_rates(transport, origin, destination)
            .map(|rates| rates.items.clone())
            .unwrap_or_default()
    }

    pub fn rate_item(
        &self,
        transport: TransportMode,
        origin: &str,
        destination: &str,
        item_key: &str,
    ) -> Option<&RateItem> {
        self.transport_rates(transport, origin, destination)?
            .item(item_key)
    }

    /// Declared billing unit of a package type
    pub fn billing_unit(
        &self,
        transport: TransportMode,
        origin: &str,
        destination: &str,
        item_key: &str,
    ) -> Option<Unit> {
        self.rate_item(transport, origin, destination, item_key)
            .map(|item| item.unit)
    }

    /// Numeric rate regardless of the stored shape. `None` means the route
    /// exists but the package type is not sold on it.
    pub fn rate_value(rates: Option<&TransportRates>, item_key: &str) -> Option<Decimal> {
        rates?.rate_value(item_key)
    }
}
