//! Tariff domain entities

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transport mode offered on a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Sea,
    AirNormal,
    AirExpress,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [Self::Sea, Self::AirNormal, Self::AirExpress];

    /// Key used in the configuration tree
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sea => "sea",
            Self::AirNormal => "air_normal",
            Self::AirExpress => "air_express",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sea => "Sea freight",
            Self::AirNormal => "Air (normal)",
            Self::AirExpress => "Air (express)",
        }
    }

    pub fn is_air(&self) -> bool {
        !matches!(self, Self::Sea)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sea" => Ok(Self::Sea),
            "air_normal" => Ok(Self::AirNormal),
            "air_express" => Ok(Self::AirExpress),
            other => Err(format!("unknown transport mode '{}'", other)),
        }
    }
}

/// Measure a rate is expressed per
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Kg,
    Piece,
    Cbm,
    Fixed,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Piece => "piece",
            Self::Cbm => "cbm",
            Self::Fixed => "fixed",
        }
    }

    /// Default unit for an item key the legacy tables do not know
    pub fn fallback_for(transport: TransportMode) -> Self {
        if transport.is_air() {
            Self::Kg
        } else {
            Self::Cbm
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" => Ok(Self::Kg),
            "piece" | "pcs" => Ok(Self::Piece),
            "cbm" | "m3" => Ok(Self::Cbm),
            "fixed" | "flat" => Ok(Self::Fixed),
            other => Err(format!("unknown unit '{}'", other)),
        }
    }
}

/// Billable package type on a (route, transport) pair, in canonical shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateItem {
    pub key: String,
    pub label: String,
    pub rate: Decimal,
    pub unit: Unit,
}

/// Embedded fields of a current-shape rate entry. Missing label or unit is
/// tolerated and filled in from the legacy tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RateItemFields {
    pub label: Option<String>,
    pub rate: Decimal,
    pub unit: Option<Unit>,
}

/// Rate entry as stored in the configuration tree
#[derive(Debug, Clone, PartialEq)]
pub enum RateValue {
    /// `"normal": 8.5`
    Legacy(Decimal),
    /// `"normal": { "label": "...", "rate": 8.5, "unit": "kg" }`
    Current(RateItemFields),
}

impl RateValue {
    /// Parse a raw entry. `None` means the entry is unusable and should be skipped.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => parse_rate(n).map(Self::Legacy),
            Value::Object(fields) => {
                let rate = match fields.get("rate")? {
                    Value::Number(n) => parse_rate(n)?,
                    // Admin forms have historically saved numeric strings.
                    Value::String(s) => parse_rate_str(s)?,
                    _ => return None,
                };
                let label = fields
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from);
                let unit = match fields.get("unit") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.parse().ok()?),
                    Some(_) => return None,
                };
                Some(Self::Current(RateItemFields { label, rate, unit }))
            }
            _ => None,
        }
    }

    pub fn rate(&self) -> Decimal {
        match self {
            Self::Legacy(rate) => *rate,
            Self::Current(fields) => fields.rate,
        }
    }
}

fn parse_rate(n: &serde_json::Number) -> Option<Decimal> {
    parse_rate_str(&n.to_string())
}

fn parse_rate_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let rate = Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()?;
    (rate >= Decimal::ZERO).then(|| rate.normalize())
}

/// Encode a decimal as a JSON number for writing back into the tree
pub fn decimal_to_json(value: Decimal) -> Value {
    serde_json::Number::from_str(&value.normalize().to_string())
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
}

/// Departure country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Origin {
    pub code: String,
    pub label: String,
    pub cities: Vec<City>,
}

/// Receiving country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub code: String,
    pub label: String,
    pub warehouses: Vec<Warehouse>,
}

/// Ordered (origin, destination) pair. Serialized as `"<origin>_<destination>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteKey {
    pub origin: String,
    pub destination: String,
}

impl RouteKey {
    pub const SEPARATOR: char = '_';

    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Split a raw key, preferring a split whose halves are known codes.
    pub fn parse(
        raw: &str,
        is_origin: impl Fn(&str) -> bool,
        is_destination: impl Fn(&str) -> bool,
    ) -> Option<Self> {
        let splits: Vec<(&str, &str)> = raw
            .match_indices(Self::SEPARATOR)
            .map(|(idx, _)| (&raw[..idx], &raw[idx + 1..]))
            .filter(|(o, d)| !o.is_empty() && !d.is_empty())
            .collect();

        splits
            .iter()
            .find(|(o, d)| is_origin(o) && is_destination(d))
            .or_else(|| splits.first())
            .map(|(o, d)| Self::new(*o, *d))
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.origin, Self::SEPARATOR, self.destination)
    }
}

/// Rate items of one transport on one route, sharing one currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportRates {
    pub mode: TransportMode,
    pub currency: String,
    pub items: Vec<RateItem>,
}

impl TransportRates {
    pub fn item(&self, key: &str) -> Option<&RateItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Numeric rate for a package type; `None` when the type is not sold here.
    pub fn rate_value(&self, key: &str) -> Option<Decimal> {
        self.item(key).map(|item| item.rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub key: RouteKey,
    pub transports: Vec<TransportRates>,
}

impl Route {
    pub fn transport(&self, mode: TransportMode) -> Option<&TransportRates> {
        self.transports.iter().find(|t| t.mode == mode)
    }
}

// ── Tests ──────────────────────────────────────────────────────
