//! Departure domain entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::tariff::TransportMode;

/// A scheduled shipment leaving `origin` for `destination`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    pub origin: String,
    pub destination: String,
    pub transport: TransportMode,
    pub departs_at: DateTime<Utc>,
    pub label: Option<String>,
}

impl Departure {
    pub fn serves(&self, origin: &str, destination: &str, transport: TransportMode) -> bool {
        self.origin == origin && self.destination == destination && self.transport == transport
    }
}
