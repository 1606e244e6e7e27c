//! Label and unit tables for rate entries stored in the legacy numeric shape.
//!
//! A legacy entry (`"phone_boxed": 15`) carries no label or unit, so both are
//! looked up here by item key. Every key ever written in the numeric shape
//! must have a row; keys not listed fall back to [`Unit::fallback_for`]
//! (kg for air, cbm for sea). That fallback is business policy and must not
//! be changed.

use super::model::{TransportMode, Unit};

struct LegacyItem {
    key: &'static str,
    label: &'static str,
    air: Unit,
    sea: Unit,
}

const fn item(key: &'static str, label: &'static str, air: Unit, sea: Unit) -> LegacyItem {
    LegacyItem {
        key,
        label,
        air,
        sea,
    }
}

static LEGACY_ITEMS: &[LegacyItem] = &[
    item("normal", "General goods", Unit::Kg, Unit::Cbm),
    item("battery", "Battery goods", Unit::Kg, Unit::Cbm),
    item("liquid", "Liquids", Unit::Kg, Unit::Cbm),
    item("cosmetics", "Cosmetics", Unit::Kg, Unit::Cbm),
    item("powder", "Powders", Unit::Kg, Unit::Cbm),
    item("food", "Food products", Unit::Kg, Unit::Cbm),
    item("textile", "Textiles", Unit::Kg, Unit::Cbm),
    item("electronics", "Electronics", Unit::Kg, Unit::Cbm),
    item("fragile", "Fragile goods", Unit::Kg, Unit::Cbm),
    item("furniture", "Furniture", Unit::Kg, Unit::Cbm),
    item("documents", "Documents", Unit::Kg, Unit::Kg),
    item("phone_boxed", "Phone (boxed)", Unit::Piece, Unit::Piece),
    item("phone_unboxed", "Phone (unboxed)", Unit::Piece, Unit::Piece),
    item("laptop", "Laptop", Unit::Piece, Unit::Piece),
    item("tablet", "Tablet", Unit::Piece, Unit::Piece),
    item("watch", "Watch", Unit::Piece, Unit::Piece),
    item("carton", "Carton", Unit::Piece, Unit::Piece),
    item("container", "Container", Unit::Fixed, Unit::Fixed),
    item("container_20", "Container 20ft", Unit::Fixed, Unit::Fixed),
    item("container_40", "Container 40ft", Unit::Fixed, Unit::Fixed),
    item("vehicle", "Vehicle", Unit::Fixed, Unit::Fixed),
];

fn lookup(key: &str) -> Option<&'static LegacyItem> {
    LEGACY_ITEMS.iter().find(|item| item.key == key)
}

/// Display label for a known legacy item key
pub fn default_label(key: &str) -> Option<&'static str> {
    lookup(key).map(|item| item.label)
}

/// Unit for a known legacy item key on the given transport
pub fn default_unit(key: &str, transport: TransportMode) -> Option<Unit> {
    lookup(key).map(|item| match transport {
        TransportMode::Sea => item.sea,
        TransportMode::AirNormal | TransportMode::AirExpress => item.air,
    })
}

/// Unit used when the entry does not declare one
pub fn resolve_unit(key: &str, transport: TransportMode) -> Unit {
    default_unit(key, transport).unwrap_or_else(|| Unit::fallback_for(transport))
}

/// Label used when the entry does not declare one
pub fn resolve_label(key: &str) -> String {
    default_label(key).map(String::from).unwrap_or_else(|| key.to_string())
}

/// All keys the tables know, in table order
pub fn known_keys() -> impl Iterator<Item = &'static str> {
    LEGACY_ITEMS.iter().map(|item| item.key)
}
