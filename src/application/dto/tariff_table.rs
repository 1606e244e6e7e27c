//! Comparison grid read model: package types × transports for one route

use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::services::RouteResolver;
use crate::domain::tariff::{TransportMode, Unit};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffColumn {
    pub mode: TransportMode,
    pub label: &'static str,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffCell {
    pub rate: Decimal,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffRow {
    pub key: String,
    pub label: String,
    /// One cell per column; `None` where the type is not sold on that transport
    pub cells: Vec<Option<TariffCell>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TariffTable {
    pub columns: Vec<TariffColumn>,
    pub rows: Vec<TariffRow>,
}

impl TariffTable {
    /// Columns in transport order, rows in first-seen package type order.
    /// Empty when the route is not configured.
    pub fn for_route(resolver: &RouteResolver, origin: &str, destination: &str) -> Self {
        let Some(route) = resolver.route(origin, destination) else {
            return Self::default();
        };

        let columns = route
            .transports
            .iter()
            .map(|rates| TariffColumn {
                mode: rates.mode,
                label: rates.mode.label(),
                currency: rates.currency.clone(),
            })
            .collect();

        let mut rows: Vec<TariffRow> = Vec::new();
        for rates in &route.transports {
            for item in &rates.items {
                if !rows.iter().any(|row| row.key == item.key) {
                    rows.push(TariffRow {
                        key: item.key.clone(),
                        label: item.label.clone(),
                        cells: Vec::with_capacity(route.transports.len()),
                    });
                }
            }
        }

        for row in &mut rows {
            row.cells = route
                .transports
                .iter()
                .map(|rates| {
                    rates.item(&row.key).map(|item| TariffCell {
                        rate: item.rate,
                        unit: item.unit,
                    })
                })
                .collect();
        }

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
