//! Per-tenant tariff engine: settings store + catalog snapshot

use std::sync::Arc;

use crate::application::services::RouteResolver;
use crate::domain::tariff::{Catalog, CatalogOptions, SettingsStore};
use crate::shared::errors::DomainResult;

use super::handle::CatalogHandle;

pub struct TariffEngine {
    store: Arc<dyn SettingsStore>,
    catalog: CatalogHandle,
    options: CatalogOptions,
}

impl TariffEngine {
    /// Engine with an empty catalog; call [`TariffEngine::reload`] to populate it
    pub fn new(store: Arc<dyn SettingsStore>, options: CatalogOptions) -> Self {
        Self {
            store,
            catalog: CatalogHandle::empty(),
            options,
        }
    }

    /// Engine populated from the store
    pub async fn load(store: Arc<dyn SettingsStore>, options: CatalogOptions) -> DomainResult<Self> {
        let engine = Self::new(store, options);
        engine.reload().await?;
        Ok(engine)
    }

    pub async fn reload(&self) -> DomainResult<Arc<Catalog>> {
        self.catalog.reload(self.store.as_ref(), &self.options).await
    }

    pub fn resolver(&self) -> RouteResolver {
        self.catalog.resolver()
    }

    pub fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    pub fn store(&self) -> &dyn SettingsStore {
        self.store.as_ref()
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }
}
