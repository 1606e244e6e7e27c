//! Editable view of the raw tariff tree
//!
//! Admin edits patch the whole tree in memory and the caller saves it back
//! in one write. Key order is preserved so transport display order set by an
//! admin survives the round trip.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::catalog::{CURRENCY_KEY, DESTINATIONS_KEY, ORIGINS_KEY, SHIPPING_RATES_KEY};
use super::model::{decimal_to_json, City, RateItem, RouteKey, TransportMode, Warehouse};
use crate::shared::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TariffTree {
    root: Map<String, Value>,
}

impl TariffTree {
    pub fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            _ => Err(DomainError::MalformedTree(
                "expected a JSON object at the top level".to_string(),
            )),
        }
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Raw route keys in tree order
    pub fn route_keys(&self) -> Vec<String> {
        self.root
            .get(SHIPPING_RATES_KEY)
            .and_then(Value::as_object)
            .map(|rates| rates.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_origin(&self, code: &str) -> bool {
        self.has_entry(ORIGINS_KEY, code)
    }

    pub fn has_destination(&self, code: &str) -> bool {
        self.has_entry(DESTINATIONS_KEY, code)
    }

    /// Create or update an origin. An existing origin keeps its position and
    /// any fields this editor does not manage.
    pub fn upsert_origin(&mut self, code: &str, label: &str, cities: &[City]) -> DomainResult<()> {
        validate_code(code)?;
        let cities: Vec<Value> = cities
            .iter()
            .map(|c| json!({ "id": c.id, "name": c.name }))
            .collect();
        upsert_place(self.section_mut(ORIGINS_KEY)?, code, label, "cities", cities)
    }

    /// Delete an origin and every route leaving from it. Returns the removed route keys.
    pub fn remove_origin(&mut self, code: &str) -> DomainResult<Vec<String>> {
        let known = self.known_codes();
        if self.section_mut(ORIGINS_KEY)?.shift_remove(code).is_none() {
            return Err(DomainError::not_found("Origin", "code", code));
        }
        self.cascade(|raw| known.route_key(raw).is_some_and(|key| key.origin == code))
    }

    pub fn upsert_destination(
        &mut self,
        code: &str,
        label: &str,
        warehouses: &[Warehouse],
    ) -> DomainResult<()> {
        validate_code(code)?;
        let warehouses: Vec<Value> = warehouses
            .iter()
            .map(|w| json!({ "id": w.id, "name": w.name }))
            .collect();
        upsert_place(
            self.section_mut(DESTINATIONS_KEY)?,
            code,
            label,
            "warehouses",
            warehouses,
        )
    }

    /// Delete a destination and every route arriving at it. Returns the removed route keys.
    pub fn remove_destination(&mut self, code: &str) -> DomainResult<Vec<String>> {
        let known = self.known_codes();
        if self.section_mut(DESTINATIONS_KEY)?.shift_remove(code).is_none() {
            return Err(DomainError::not_found("Destination", "code", code));
        }
        self.cascade(|raw| known.route_key(raw).is_some_and(|key| key.destination == code))
    }

    /// Create an empty route. Both ends must already exist.
    pub fn add_route(&mut self, origin: &str, destination: &str) -> DomainResult<RouteKey> {
        if !self.has_origin(origin) {
            return Err(DomainError::not_found("Origin", "code", origin));
        }
        if !self.has_destination(destination) {
            return Err(DomainError::not_found("Destination", "code", destination));
        }
        let key = RouteKey::new(origin, destination);
        let raw = key.to_string();
        let rates = self.section_mut(SHIPPING_RATES_KEY)?;
        if rates.contains_key(&raw) {
            return Err(DomainError::Conflict(format!("route {}", raw)));
        }
        rates.insert(raw, Value::Object(Map::new()));
        Ok(key)
    }

    pub fn remove_route(&mut self, route: &RouteKey) -> DomainResult<()> {
        let raw = route.to_string();
        self.section_mut(SHIPPING_RATES_KEY)?
            .shift_remove(&raw)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Route", "key", raw))
    }

    /// Set the single currency of a transport group, creating the group if needed
    pub fn set_currency(
        &mut self,
        route: &RouteKey,
        transport: TransportMode,
        currency: &str,
    ) -> DomainResult<()> {
        let currency = currency.trim();
        if currency.is_empty() {
            return Err(DomainError::Validation("currency must not be empty".to_string()));
        }
        let group = self.transport_mut(route, transport, true)?;
        group.insert(CURRENCY_KEY.to_string(), Value::String(currency.to_string()));
        Ok(())
    }

    /// Write a rate item in the current shape, replacing a legacy entry in place.
    pub fn upsert_rate_item(
        &mut self,
        route: &RouteKey,
        transport: TransportMode,
        item: &RateItem,
    ) -> DomainResult<()> {
        if item.key.trim().is_empty() || item.key == CURRENCY_KEY {
            return Err(DomainError::Validation(format!(
                "invalid package type key '{}'",
                item.key
            )));
        }
        if item.rate < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "rate for '{}' must not be negative",
                item.key
            )));
        }
        let group = self.transport_mut(route, transport, true)?;
        group.insert(
            item.key.clone(),
            json!({
                "label": item.label,
                "rate": decimal_to_json(item.rate),
                "unit": item.unit.as_str(),
            }),
        );
        Ok(())
    }

    pub fn remove_rate_item(
        &mut self,
        route: &RouteKey,
        transport: TransportMode,
        key: &str,
    ) -> DomainResult<()> {
        if key == CURRENCY_KEY {
            return Err(DomainError::Validation("currency is not a package type".to_string()));
        }
        self.transport_mut(route, transport, false)?
            .shift_remove(key)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Package type", "key", key))
    }

    pub fn remove_transport(&mut self, route: &RouteKey, transport: TransportMode) -> DomainResult<()> {
        self.route_mut(route)?
            .shift_remove(transport.as_str())
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Transport", "mode", transport.as_str()))
    }

    fn has_entry(&self, section: &str, code: &str) -> bool {
        self.root
            .get(section)
            .and_then(Value::as_object)
            .is_some_and(|entries| entries.contains_key(code))
    }

    fn codes(&self, section: &str) -> HashSet<String> {
        self.root
            .get(section)
            .and_then(Value::as_object)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Origin and destination codes as they are before an edit
    fn known_codes(&self) -> KnownCodes {
        KnownCodes {
            origins: self.codes(ORIGINS_KEY),
            destinations: self.codes(DESTINATIONS_KEY),
        }
    }

    fn cascade(&mut self, involves: impl Fn(&str) -> bool) -> DomainResult<Vec<String>> {
        let rates = self.section_mut(SHIPPING_RATES_KEY)?;
        let mut removed = Vec::new();
        rates.retain(|key, _| {
            if involves(key) {
                removed.push(key.clone());
                false
            } else {
                true
            }
        });
        debug!(routes = ?removed, "Cascaded route removal");
        Ok(removed)
    }

    fn section_mut(&mut self, name: &str) -> DomainResult<&mut Map<String, Value>> {
        let entry = self
            .root
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        entry
            .as_object_mut()
            .ok_or_else(|| DomainError::MalformedTree(format!("section '{}' is not an object", name)))
    }

    fn route_mut(&mut self, route: &RouteKey) -> DomainResult<&mut Map<String, Value>> {
        let raw = route.to_string();
        match self.section_mut(SHIPPING_RATES_KEY)?.get_mut(&raw) {
            Some(Value::Object(route)) => Ok(route),
            Some(_) => Err(DomainError::MalformedTree(format!("route '{}' is not an object", raw))),
            None => Err(DomainError::not_found("Route", "key", raw)),
        }
    }

    fn transport_mut(
        &mut self,
        route: &RouteKey,
        transport: TransportMode,
        create: bool,
    ) -> DomainResult<&mut Map<String, Value>> {
        let group = self.route_mut(route)?;
        if create {
            group
                .entry(transport.as_str().to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        match group.get_mut(transport.as_str()) {
            Some(Value::Object(items)) => Ok(items),
            Some(_) => Err(DomainError::MalformedTree(format!(
                "route '{}': transport '{}' is not an object",
                route, transport
            ))),
            None => Err(DomainError::not_found("Transport", "mode", transport.as_str())),
        }
    }
}

struct KnownCodes {
    origins: HashSet<String>,
    destinations: HashSet<String>,
}

impl KnownCodes {
    /// Split a raw route key the same way the catalog does
    fn route_key(&self, raw: &str) -> Option<RouteKey> {
        RouteKey::parse(
            raw,
            |code| self.origins.contains(code),
            |code| self.destinations.contains(code),
        )
    }
}

fn validate_code(code: &str) -> DomainResult<()> {
    if code.trim().is_empty() {
        return Err(DomainError::Validation("code must not be empty".to_string()));
    }
    if code.contains(RouteKey::SEPARATOR) {
        return Err(DomainError::Validation(format!(
            "code '{}' must not contain '{}'",
            code,
            RouteKey::SEPARATOR
        )));
    }
    Ok(())
}

fn upsert_place(
    section: &mut Map<String, Value>,
    code: &str,
    label: &str,
    list_key: &str,
    list: Vec<Value>,
) -> DomainResult<()> {
    let entry = section
        .entry(code.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Some(fields) = entry.as_object_mut() {
        let label = if label.trim().is_empty() { code } else { label };
        fields.insert("label".to_string(), Value::String(label.to_string()));
        fields.insert(list_key.to_string(), Value::Array(list));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tariff::model::Unit;

    fn tree() -> TariffTree {
        TariffTree::from_value(json!({
            "origins": {
                "China": { "label": "China", "cities": [] },
                "Dubai": { "label": "UAE", "cities": [] }
            },
            "destinations": {
                "Cameroon": { "label": "Cameroon", "warehouses": [] },
                "Gabon": { "label": "Gabon", "warehouses": [] }
            },
            "shipping_rates": {
                "China_Cameroon": { "sea": { "currency": "USD", "normal": 250 } },
                "China_Gabon": { "air_normal": { "currency": "USD", "normal": 11 } },
                "Dubai_Cameroon": { "sea": { "currency": "USD", "normal": 180 } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn removing_origin_cascades_its_routes() {
        let mut tree = tree();
        let removed = tree.remove_origin("China").unwrap();
        assert_eq!(removed, vec!["China_Cameroon", "China_Gabon"]);
        assert_eq!(tree.route_keys(), vec!["Dubai_Cameroon"]);
        assert!(!tree.has_origin("China"));
    }

    #[test]
    fn removing_destination_cascades_its_routes() {
        let mut tree = tree();
        let removed = tree.remove_destination("Cameroon").unwrap();
        assert_eq!(removed, vec!["China_Cameroon", "Dubai_Cameroon"]);
        assert_eq!(tree.route_keys(), vec!["China_Gabon"]);
    }

    #[test]
    fn cascade_resolves_codes_containing_separator() {
        let mut tree = TariffTree::from_value(json!({
            "origins": {
                "China": { "label": "China" },
                "Hong": { "label": "Hong" },
                "Hong_Kong": { "label": "Hong Kong" }
            },
            "destinations": {
                "Congo": { "label": "Congo" },
                "DR_Congo": { "label": "DR Congo" },
                "Kong": { "label": "Kong" }
            },
            "shipping_rates": {
                "China_Congo": {},
                "China_DR_Congo": {},
                "Hong_Kong_Congo": {},
                "Hong_Kong": {},
                "Hong_Kong_DR_Congo": {}
            }
        }))
        .unwrap();

        let removed = tree.remove_destination("Congo").unwrap();
        assert_eq!(removed, vec!["China_Congo", "Hong_Kong_Congo"]);
        assert_eq!(
            tree.route_keys(),
            vec!["China_DR_Congo", "Hong_Kong", "Hong_Kong_DR_Congo"]
        );

        let removed = tree.remove_origin("Hong").unwrap();
        assert_eq!(removed, vec!["Hong_Kong"]);
        assert_eq!(tree.route_keys(), vec!["China_DR_Congo", "Hong_Kong_DR_Congo"]);
    }

    #[test]
    fn removing_unknown_origin_is_not_found() {
        let mut tree = tree();
        let err = tree.remove_origin("Japan").unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Origin", .. }));
        assert_eq!(tree.route_keys().len(), 3);
    }

    #[test]
    fn add_route_requires_both_ends() {
        let mut tree = tree();
        assert!(matches!(
            tree.add_route("Japan", "Gabon"),
            Err(DomainError::NotFound { entity: "Origin", .. })
        ));
        assert!(matches!(
            tree.add_route("Dubai", "Chad"),
            Err(DomainError::NotFound { entity: "Destination", .. })
        ));
        assert!(matches!(
            tree.add_route("China", "Gabon"),
            Err(DomainError::Conflict(_))
        ));

        let key = tree.add_route("Dubai", "Gabon").unwrap();
        assert_eq!(key.to_string(), "Dubai_Gabon");
        assert_eq!(tree.route_keys().last().map(String::as_str), Some("Dubai_Gabon"));
    }

    #[test]
    fn upsert_origin_keeps_position_and_validates_code() {
        let mut tree = tree();
        tree.upsert_origin(
            "China",
            "People's Republic of China",
            &[City { id: "gz".into(), name: "Guangzhou".into() }],
        )
        .unwrap();
        let value = tree.as_value();
        let origins: Vec<_> = value["origins"].as_object().unwrap().keys().collect();
        assert_eq!(origins, vec!["China", "Dubai"]);
        assert_eq!(value["origins"]["China"]["cities"][0]["name"], "Guangzhou");

        assert!(matches!(tree.upsert_origin("", "x", &[]), Err(DomainError::Validation(_))));
        assert!(matches!(
            tree.upsert_origin("Hong_Kong", "x", &[]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn upsert_rate_item_writes_current_shape() {
        let mut tree = tree();
        let route = RouteKey::new("China", "Cameroon");
        tree.upsert_rate_item(
            &route,
            TransportMode::Sea,
            &RateItem {
                key: "normal".into(),
                label: "General goods".into(),
                rate: Decimal::new(2600, 1),
                unit: Unit::Cbm,
            },
        )
        .unwrap();

        let value = tree.into_value();
        assert_eq!(
            value["shipping_rates"]["China_Cameroon"]["sea"]["normal"],
            json!({ "label": "General goods", "rate": 260, "unit": "cbm" })
        );
        assert_eq!(value["shipping_rates"]["China_Cameroon"]["sea"]["currency"], "USD");
    }

    #[test]
    fn upsert_rate_item_creates_transport_group() {
        let mut tree = tree();
        let route = RouteKey::new("China", "Cameroon");
        tree.set_currency(&route, TransportMode::AirExpress, "EUR").unwrap();
        tree.upsert_rate_item(
            &route,
            TransportMode::AirExpress,
            &RateItem {
                key: "battery".into(),
                label: "Battery goods".into(),
                rate: Decimal::from(18),
                unit: Unit::Kg,
            },
        )
        .unwrap();

        let value = tree.as_value();
        let group = &value["shipping_rates"]["China_Cameroon"]["air_express"];
        assert_eq!(group["currency"], "EUR");
        assert_eq!(group["battery"]["rate"], 18);
    }

    #[test]
    fn upsert_rate_item_rejects_bad_input() {
        let mut tree = tree();
        let route = RouteKey::new("China", "Cameroon");
        let mut item = RateItem {
            key: "currency".into(),
            label: "x".into(),
            rate: Decimal::ONE,
            unit: Unit::Kg,
        };
        assert!(tree.upsert_rate_item(&route, TransportMode::Sea, &item).is_err());

        item.key = "normal".into();
        item.rate = Decimal::NEGATIVE_ONE;
        assert!(tree.upsert_rate_item(&route, TransportMode::Sea, &item).is_err());

        item.rate = Decimal::ONE;
        assert!(matches!(
            tree.upsert_rate_item(&RouteKey::new("Japan", "Chad"), TransportMode::Sea, &item),
            Err(DomainError::NotFound { entity: "Route", .. })
        ));
    }

    #[test]
    fn remove_item_transport_and_route() {
        let mut tree = tree();
        let route = RouteKey::new("China", "Cameroon");

        tree.remove_rate_item(&route, TransportMode::Sea, "normal").unwrap();
        assert!(tree.remove_rate_item(&route, TransportMode::Sea, "normal").is_err());
        assert!(tree.remove_rate_item(&route, TransportMode::Sea, "currency").is_err());

        tree.remove_transport(&route, TransportMode::Sea).unwrap();
        assert!(tree.remove_transport(&route, TransportMode::Sea).is_err());

        tree.remove_route(&route).unwrap();
        assert_eq!(tree.route_keys(), vec!["China_Gabon", "Dubai_Cameroon"]);
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(TariffTree::from_value(json!("tariffs")).is_err());
        assert_eq!(TariffTree::from_value(Value::Null).unwrap(), TariffTree::default());
    }

    #[test]
    fn edits_on_empty_tree_create_sections() {
        let mut tree = TariffTree::default();
        tree.upsert_origin("China", "China", &[]).unwrap();
        tree.upsert_destination("Gabon", "", &[]).unwrap();
        tree.add_route("China", "Gabon").unwrap();

        let value = tree.into_value();
        assert_eq!(value["destinations"]["Gabon"]["label"], "Gabon");
        assert_eq!(value["shipping_rates"]["China_Gabon"], json!({}));
    }
}
