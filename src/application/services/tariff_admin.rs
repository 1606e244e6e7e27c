//! Admin tariff editing
//!
//! Every edit is load tree → patch in memory → save whole tree → reload.
//! There are no targeted remote writes, so the catalog swap on reload is the
//! only mutation other readers ever observe.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::catalog::TariffEngine;
use crate::domain::tariff::{City, RateItem, RouteKey, TariffTree, TransportMode, Warehouse};
use crate::shared::errors::DomainResult;

pub struct TariffAdminService {
    engine: Arc<TariffEngine>,
}

impl TariffAdminService {
    pub fn new(engine: Arc<TariffEngine>) -> Self {
        Self { engine }
    }

    /// Apply `patch` to a fresh copy of the stored tree. Nothing is saved if
    /// the patch fails.
    ///
    /// A reload failure after a successful save is returned as an error, but
    /// the new tree is already stored and the previous snapshot stays active
    /// until the next successful reload.
    pub async fn edit<T>(
        &self,
        patch: impl FnOnce(&mut TariffTree) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let raw = self.engine.store().load().await?;
        let mut tree = TariffTree::from_value(raw)?;
        let output = patch(&mut tree)?;

        self.engine.store().save(&tree.into_value()).await?;
        let catalog = match self.engine.reload().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "Tariff tree saved but catalog reload failed");
                return Err(e);
            }
        };

        info!(routes = catalog.routes().len(), "Tariff tree saved");
        Ok(output)
    }

    pub async fn upsert_origin(&self, code: &str, label: &str, cities: Vec<City>) -> DomainResult<()> {
        self.edit(|tree| tree.upsert_origin(code, label, &cities)).await
    }

    /// Returns the route keys removed along with the origin
    pub async fn delete_origin(&self, code: &str) -> DomainResult<Vec<String>> {
        let removed = self.edit(|tree| tree.remove_origin(code)).await?;
        info!(origin = code, routes = ?removed, "Origin deleted");
        Ok(removed)
    }

    pub async fn upsert_destination(
        &self,
        code: &str,
        label: &str,
        warehouses: Vec<Warehouse>,
    ) -> DomainResult<()> {
        self.edit(|tree| tree.upsert_destination(code, label, &warehouses))
            .await
    }

    /// Returns the route keys removed along with the destination
    pub async fn delete_destination(&self, code: &str) -> DomainResult<Vec<String>> {
        let removed = self.edit(|tree| tree.remove_destination(code)).await?;
        info!(destination = code, routes = ?removed, "Destination deleted");
        Ok(removed)
    }

    pub async fn add_route(&self, origin: &str, destination: &str) -> DomainResult<RouteKey> {
        self.edit(|tree| tree.add_route(origin, destination)).await
    }

    pub async fn delete_route(&self, route: &RouteKey) -> DomainResult<()> {
        self.edit(|tree| tree.remove_route(route)).await
    }

    pub async fn set_currency(
        &self,
        route: &RouteKey,
        transport: TransportMode,
        currency: &str,
    ) -> DomainResult<()> {
        self.edit(|tree| tree.set_currency(route, transport, currency))
            .await
    }

    pub async fn upsert_rate_item(
        &self,
        route: &RouteKey,
        transport: TransportMode,
        item: RateItem,
    ) -> DomainResult<()> {
        self.edit(|tree| tree.upsert_rate_item(route, transport, &item))
            .await
    }

    pub async fn delete_rate_item(
        &self,
        route: &RouteKey,
        transport: TransportMode,
        key: &str,
    ) -> DomainResult<()> {
        self.edit(|tree| tree.remove_rate_item(route, transport, key))
            .await
    }

    pub async fn delete_transport(&self, route: &RouteKey, transport: TransportMode) -> DomainResult<()> {
        self.edit(|tree| tree.remove_transport(route, transport)).await
    }
}
