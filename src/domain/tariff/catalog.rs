//! Rate catalog: normalized, indexed view of the raw tariff tree
//!
//! Built once per load from the JSON tree returned by the settings store.
//! Malformed origins, routes, transports or items are skipped with a warning
//! so partially-migrated data still yields a usable catalog. Only a tree
//! whose top level is not a JSON object is rejected.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::legacy;
use super::model::{
    City, Destination, Origin, RateItem, RateValue, Route, RouteKey, TransportMode,
    TransportRates, Warehouse,
};
use crate::shared::errors::{DomainError, DomainResult};

pub const ORIGINS_KEY: &str = "origins";
pub const DESTINATIONS_KEY: &str = "destinations";
pub const SHIPPING_RATES_KEY: &str = "shipping_rates";
pub const CURRENCY_KEY: &str = "currency";

/// Options applied while building a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Currency for transport groups that do not declare one
    pub default_currency: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
        }
    }
}

/// Immutable catalog snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    origins: Vec<Origin>,
    destinations: Vec<Destination>,
    routes: Vec<Route>,
    route_index: HashMap<String, usize>,
    skipped: usize,
}

impl Catalog {
    /// Catalog with no origins, destinations or routes
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(tree: &Value, options: &CatalogOptions) -> DomainResult<Self> {
        let root = tree.as_object().ok_or_else(|| {
            DomainError::MalformedTree(format!("expected a JSON object, got {}", kind(tree)))
        })?;

        let mut catalog = Catalog::default();

        for (code, entry) in section(root, ORIGINS_KEY, &mut catalog.skipped) {
            match parse_origin(code, entry) {
                Some(origin) => catalog.origins.push(origin),
                None => catalog.skip(format_args!("origin '{}' is not an object", code)),
            }
        }

        for (code, entry) in section(root, DESTINATIONS_KEY, &mut catalog.skipped) {
            match parse_destination(code, entry) {
                Some(destination) => catalog.destinations.push(destination),
                None => catalog.skip(format_args!("destination '{}' is not an object", code)),
            }
        }

        let rates: Vec<(&String, &Value)> =
            section(root, SHIPPING_RATES_KEY, &mut catalog.skipped).collect();
        for (raw_key, entry) in rates {
            if let Some(route) = catalog.parse_route(raw_key, entry, options) {
                catalog.route_index.insert(raw_key.clone(), catalog.routes.len());
                catalog.routes.push(route);
            }
        }

        info!(
            origins = catalog.origins.len(),
            destinations = catalog.destinations.len(),
            routes = catalog.routes.len(),
            skipped = catalog.skipped,
            "Tariff catalog built"
        );

        Ok(catalog)
    }

    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn origin(&self, code: &str) -> Option<&Origin> {
        self.origins.iter().find(|o| o.code == code)
    }

    pub fn destination(&self, code: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.code == code)
    }

    pub fn route(&self, key: &RouteKey) -> Option<&Route> {
        self.route_index
            .get(&key.to_string())
            .and_then(|idx| self.routes.get(*idx))
    }

    /// Number of entries dropped as malformed during the build
    pub fn skipped_entries(&self) -> usize {
        self.skipped
    }

    /// Canonical rate item for a package type, or `None` when it is not sold
    /// on this route and transport.
    pub fn resolve_rate_item(
        &self,
        route: &RouteKey,
        transport: TransportMode,
        item_key: &str,
    ) -> Option<&RateItem> {
        self.route(route)?.transport(transport)?.item(item_key)
    }

    fn skip(&mut self, reason: std::fmt::Arguments<'_>) {
        self.skipped += 1;
        warn!("Skipping tariff entry: {}", reason);
    }

    fn parse_route(
        &mut self,
        raw_key: &str,
        entry: &Value,
        options: &CatalogOptions,
    ) -> Option<Route> {
        let key = RouteKey::parse(
            raw_key,
            |code| self.origin(code).is_some(),
            |code| self.destination(code).is_some(),
        );
        let Some(key) = key else {
            self.skip(format_args!("route key '{}' has no origin/destination split", raw_key));
            return None;
        };
        let Some(transports) = entry.as_object() else {
            self.skip(format_args!("route '{}' is not an object", raw_key));
            return None;
        };

        if self.origin(&key.origin).is_none() || self.destination(&key.destination).is_none() {
            debug!(route = raw_key, "Route references an unlisted origin or destination");
        }

        let mut route = Route {
            key,
            transports: Vec::with_capacity(transports.len()),
        };

        for (mode_key, group) in transports {
            let Ok(mode) = mode_key.parse::<TransportMode>() else {
                self.skip(format_args!("route '{}': unknown transport '{}'", raw_key, mode_key));
                continue;
            };
            let Some(group) = group.as_object() else {
                self.skip(format_args!("route '{}': transport '{}' is not an object", raw_key, mode));
                continue;
            };
            let rates = self.parse_transport(raw_key, mode, group, options);
            route.transports.push(rates);
        }

        Some(route)
    }

    fn parse_transport(
        &mut self,
        raw_key: &str,
        mode: TransportMode,
        group: &Map<String, Value>,
        options: &CatalogOptions,
    ) -> TransportRates {
        let currency = match group.get(CURRENCY_KEY) {
            Some(Value::String(c)) if !c.trim().is_empty() => c.trim().to_string(),
            None => options.default_currency.clone(),
            Some(other) => {
                warn!(
                    route = raw_key,
                    transport = %mode,
                    value = %other,
                    "Unusable currency, using default"
                );
                options.default_currency.clone()
            }
        };

        let mut items = Vec::with_capacity(group.len());
        for (item_key, raw) in group {
            if item_key == CURRENCY_KEY {
                continue;
            }
            match RateValue::from_json(raw) {
                Some(value) => items.push(canonicalize(item_key, mode, value)),
                None => self.skip(format_args!(
                    "route '{}': {} item '{}' has unusable value {}",
                    raw_key, mode, item_key, raw
                )),
            }
        }

        TransportRates {
            mode,
            currency,
            items,
        }
    }
}

/// Resolve either stored shape into the one canonical rate item
pub fn canonicalize(key: &str, transport: TransportMode, value: RateValue) -> RateItem {
    match value {
        RateValue::Legacy(rate) => RateItem {
            key: key.to_string(),
            label: legacy::resolve_label(key),
            rate,
            unit: legacy::resolve_unit(key, transport),
        },
        RateValue::Current(fields) => RateItem {
            key: key.to_string(),
            label: fields.label.unwrap_or_else(|| legacy::resolve_label(key)),
            rate: fields.rate,
            unit: fields
                .unit
                .unwrap_or_else(|| legacy::resolve_unit(key, transport)),
        },
    }
}

fn section<'a>(
    root: &'a Map<String, Value>,
    name: &str,
    skipped: &mut usize,
) -> impl Iterator<Item = (&'a String, &'a Value)> {
    let map = match root.get(name) {
        Some(Value::Object(map)) => Some(map),
        None | Some(Value::Null) => None,
        Some(other) => {
            *skipped += 1;
            warn!(section = name, kind = kind(other), "Tariff tree section is not an object");
            None
        }
    };
    map.into_iter().flat_map(|m| m.iter())
}

fn parse_origin(code: &str, entry: &Value) -> Option<Origin> {
    let fields = entry.as_object()?;
    Some(Origin {
        code: code.to_string(),
        label: label_or_code(fields, code),
        cities: named_list(fields.get("cities"))
            .map(|(id, name)| City { id, name })
            .collect(),
    })
}

fn parse_destination(code: &str, entry: &Value) -> Option<Destination> {
    let fields = entry.as_object()?;
    Some(Destination {
        code: code.to_string(),
        label: label_or_code(fields, code),
        warehouses: named_list(fields.get("warehouses"))
            .map(|(id, name)| Warehouse { id, name })
            .collect(),
    })
}

fn label_or_code(fields: &Map<String, Value>, code: &str) -> String {
    fields
        .get("label")
        .and_then(Value::as_str)
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(code)
        .to_string()
}

/// `[{"id", "name"}]` entries; ids may be numbers or strings
fn named_list(value: Option<&Value>) -> impl Iterator<Item = (String, String)> + '_ {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let id = match entry.get("id")? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let name = entry.get("name").and_then(Value::as_str)?.to_string();
            Some((id, name))
        })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
