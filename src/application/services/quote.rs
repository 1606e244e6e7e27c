//! Quote service: the caller-level estimate flow
//!
//! Availability is decided before the estimator runs: a package type that is
//! not sold on the route is reported as unavailable, never as a missing
//! measure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::estimator::{estimate, EstimateResult};
use super::resolver::RouteResolver;
use crate::application::catalog::TariffEngine;
use crate::domain::departure::{Departure, DeparturesService};
use crate::domain::tariff::TransportMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub origin: String,
    pub destination: String,
    pub transport: TransportMode,
    pub rate_item_key: String,
    /// Weight (kg), piece count or volume (m³), depending on the item's unit
    #[serde(default)]
    pub measure: Option<f64>,
}

/// Why no estimate can be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailability {
    Route,
    Transport,
    PackageType,
}

impl Unavailability {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Route => "This route is not available",
            Self::Transport => "This transport is not available on this route",
            Self::PackageType => "This package type is not available on this route",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Unavailable(Unavailability),
    Estimate(EstimateResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub outcome: QuoteOutcome,
    pub departure: Option<Departure>,
}

/// Resolve availability, then estimate
pub fn resolve_quote(resolver: &RouteResolver, request: &EstimateRequest) -> QuoteOutcome {
    let Some(route) = resolver.route(&request.origin, &request.destination) else {
        return QuoteOutcome::Unavailable(Unavailability::Route);
    };
    let Some(rates) = route.transport(request.transport) else {
        return QuoteOutcome::Unavailable(Unavailability::Transport);
    };
    let Some(item) = rates.item(&request.rate_item_key) else {
        return QuoteOutcome::Unavailable(Unavailability::PackageType);
    };
    QuoteOutcome::Estimate(estimate(item, &rates.currency, request.measure))
}

pub struct QuoteService {
    engine: Arc<TariffEngine>,
    departures: Arc<dyn DeparturesService>,
}

impl QuoteService {
    pub fn new(engine: Arc<TariffEngine>, departures: Arc<dyn DeparturesService>) -> Self {
        Self { engine, departures }
    }

    /// Quote against the current catalog snapshot. The next departure is
    /// attached for display; a failing schedule lookup does not block the quote.
    pub async fn quote(&self, request: &EstimateRequest) -> Quote {
        let outcome = resolve_quote(&self.engine.resolver(), request);

        let departure = match &outcome {
            QuoteOutcome::Estimate(_) => self.next_departure(request).await,
            QuoteOutcome::Unavailable(reason) => {
                debug!(
                    origin = %request.origin,
                    destination = %request.destination,
                    transport = %request.transport,
                    item = %request.rate_item_key,
                    ?reason,
                    "Quote unavailable"
                );
                None
            }
        };

        if let QuoteOutcome::Estimate(result) = &outcome {
            info!(
                origin = %request.origin,
                destination = %request.destination,
                transport = %request.transport,
                item = %request.rate_item_key,
                computable = result.is_computable(),
                "Quote resolved"
            );
        }

        Quote { outcome, departure }
    }

    async fn next_departure(&self, request: &EstimateRequest) -> Option<Departure> {
        match self
            .departures
            .next_departure(&request.origin, &request.destination, request.transport)
            .await
        {
            Ok(departure) => departure,
            Err(e) => {
                warn!(error = %e, "Departure lookup failed");
                None
            }
        }
    }
}
