//! Departure schedule port

use async_trait::async_trait;

use super::model::Departure;
use crate::domain::tariff::TransportMode;
use crate::shared::errors::DomainResult;

#[async_trait]
pub trait DeparturesService: Send + Sync {
    /// Next scheduled departure for the lane, if any
    async fn next_departure(
        &self,
        origin: &str,
        destination: &str,
        transport: TransportMode,
    ) -> DomainResult<Option<Departure>>;
}
