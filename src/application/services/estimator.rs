//! Cost estimator
//!
//! Turns a resolved rate item and an optional measure into either a cost or
//! a "rate only" result. Branches are taken in this order:
//!
//! 1. `fixed`: always computable, amount is the rate
//! 2. `cbm` with a positive volume
//! 3. `piece` with at least one whole piece
//! 4. `kg` with a positive weight
//! 5. anything else: rate only, with a hint naming the missing measure
//!
//! Zero, negative, NaN, infinite and absent measures all land in branch 5.
//! Amounts are not rounded here.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::domain::tariff::{RateItem, Unit};

/// Measure the user still has to enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMeasure {
    Volume,
    Weight,
    Quantity,
}

impl MissingMeasure {
    pub fn for_unit(unit: Unit) -> Option<Self> {
        match unit {
            Unit::Cbm => Some(Self::Volume),
            Unit::Kg => Some(Self::Weight),
            Unit::Piece => Some(Self::Quantity),
            Unit::Fixed => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Weight => "weight",
            Self::Quantity => "quantity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimateResult {
    Computed {
        amount: Decimal,
        currency: String,
        unit: Unit,
        breakdown: String,
    },
    RateOnly {
        unit_rate: Decimal,
        unit: Unit,
        currency: String,
        missing: MissingMeasure,
    },
}

impl EstimateResult {
    pub fn is_computable(&self) -> bool {
        matches!(self, Self::Computed { .. })
    }

    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Computed { amount, .. } => Some(*amount),
            Self::RateOnly { .. } => None,
        }
    }

    pub fn currency(&self) -> &str {
        match self {
            Self::Computed { currency, .. } | Self::RateOnly { currency, .. } => currency,
        }
    }
}

pub fn estimate(item: &RateItem, currency: &str, measure: Option<f64>) -> EstimateResult {
    let measure = measure.and_then(usable_measure);
    let rate = item.rate;

    let computed = match (item.unit, measure) {
        (Unit::Fixed, _) => Some((rate, "flat rate".to_string())),
        (Unit::Cbm, Some(volume)) => volume.checked_mul(rate).map(|amount| {
            (
                amount,
                format!("{} m³ × {} {}/m³", volume, rate, currency),
            )
        }),
        (Unit::Piece, Some(count)) if count.trunc() >= Decimal::ONE => {
            let pieces = count.trunc();
            pieces.checked_mul(rate).map(|amount| {
                (
                    amount,
                    format!("{} piece(s) × {} {}/piece", pieces, rate, currency),
                )
            })
        }
        (Unit::Kg, Some(weight)) => weight.checked_mul(rate).map(|amount| {
            (amount, format!("{} kg × {} {}/kg", weight, rate, currency))
        }),
        _ => None,
    };

    match computed {
        Some((amount, breakdown)) => EstimateResult::Computed {
            amount,
            currency: currency.to_string(),
            unit: item.unit,
            breakdown,
        },
        None => {
            let missing = MissingMeasure::for_unit(item.unit).unwrap_or(MissingMeasure::Quantity);
            if measure.is_some() {
                warn!(item = %item.key, unit = %item.unit, "Measure out of range, showing rate only");
            }
            EstimateResult::RateOnly {
                unit_rate: rate,
                unit: item.unit,
                currency: currency.to_string(),
                missing,
            }
        }
    }
}

fn usable_measure(value: f64) -> Option<Decimal> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    let Some(measure) = Decimal::from_f64(value) else {
        warn!(measure = value, "Measure outside decimal range, treating as not entered");
        return None;
    };
    Some(measure.normalize()).filter(|m| *m > Decimal::ZERO)
}
