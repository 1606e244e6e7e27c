//! Tenant registry: one tariff engine per tenant

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use super::engine::TariffEngine;
use crate::shared::errors::DomainResult;

/// Thread-safe registry of tenant tariff engines
pub struct TenantEngines {
    engines: DashMap<String, Arc<TariffEngine>>,
}

/// Shared, reference-counted tenant registry
pub type SharedTenantEngines = Arc<TenantEngines>;

impl TenantEngines {
    pub fn new() -> Self {
        Self {
            engines: DashMap::new(),
        }
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared() -> SharedTenantEngines {
        Arc::new(Self::new())
    }

    /// Register (or replace) the engine for a tenant
    pub fn register(&self, tenant_id: &str, engine: Arc<TariffEngine>) {
        info!(tenant_id, "Registering tariff engine");
        self.engines.insert(tenant_id.to_string(), engine);
    }

    pub fn get(&self, tenant_id: &str) -> Option<Arc<TariffEngine>> {
        self.engines.get(tenant_id).map(|e| e.value().clone())
    }

    pub fn remove(&self, tenant_id: &str) -> Option<Arc<TariffEngine>> {
        match self.engines.remove(tenant_id) {
            Some((_, engine)) => {
                info!(tenant_id, "Removed tariff engine");
                Some(engine)
            }
            None => {
                warn!(tenant_id, "Attempted to remove unknown tenant");
                None
            }
        }
    }

    pub fn tenant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.engines.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Reload every tenant. Each tenant's result is reported separately; a
    /// failing tenant keeps its previous snapshot.
    pub async fn reload_all(&self) -> Vec<(String, DomainResult<()>)> {
        let engines: Vec<(String, Arc<TariffEngine>)> = self
            .engines
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        let mut results = Vec::with_capacity(engines.len());
        for (tenant_id, engine) in engines {
            let result = engine.reload().await.map(|_| ());
            if let Err(e) = &result {
                warn!(tenant_id = %tenant_id, error = %e, "Tenant catalog reload failed");
            }
            results.push((tenant_id, result));
        }
        results.sort_by(|a, b| a.0.cmp(&b.0));
        results
    }
}

impl Default for TenantEngines {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tariff::{CatalogOptions, SettingsStore, TransportMode};
    use crate::infrastructure::storage::InMemorySettingsStore;
    use crate::shared::errors::DomainError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct OfflineStore;

    #[async_trait]
    impl SettingsStore for OfflineStore {
        async fn load(&self) -> DomainResult<Value> {
            Err(DomainError::Storage("offline".into()))
        }

        async fn save(&self, _tree: &Value) -> DomainResult<()> {
            Err(DomainError::Storage("offline".into()))
        }
    }

    fn engine_with(tree: Value) -> Arc<TariffEngine> {
        Arc::new(TariffEngine::new(
            Arc::new(InMemorySettingsStore::with_tree(tree)),
            CatalogOptions::default(),
        ))
    }

    #[tokio::test]
    async fn tenants_are_isolated() {
        let registry = TenantEngines::new();
        registry.register(
            "acme",
            engine_with(json!({
                "shipping_rates": { "China_Cameroon": { "sea": { "normal": 250 } } }
            })),
        );
        registry.register(
            "globex",
            engine_with(json!({
                "shipping_rates": { "Dubai_Gabon": { "air_normal": { "normal": 9 } } }
            })),
        );

        let results = registry.reload_all().await;
        assert!(results.iter().all(|(_, r)| r.is_ok()));

        let acme = registry.get("acme").unwrap().resolver();
        assert_eq!(acme.available_transports("China", "Cameroon").len(), 1);
        assert!(acme.available_transports("Dubai", "Gabon").is_empty());

        let globex = registry.get("globex").unwrap().resolver();
        assert_eq!(
            globex.available_transports("Dubai", "Gabon")[0].mode,
            TransportMode::AirNormal
        );
    }

    #[tokio::test]
    async fn one_failing_tenant_does_not_affect_others() {
        let registry = TenantEngines::new();
        registry.register(
            "acme",
            engine_with(json!({ "shipping_rates": { "China_Cameroon": { "sea": { "normal": 1 } } } })),
        );
        registry.register(
            "offline",
            Arc::new(TariffEngine::new(Arc::new(OfflineStore), CatalogOptions::default())),
        );

        let results = registry.reload_all().await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "acme");
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, "offline");
        assert!(results[1].1.as_ref().unwrap_err().is_store_failure());
    }

    #[test]
    fn register_get_remove() {
        let registry = TenantEngines::new();
        assert!(registry.is_empty());
        registry.register("b", engine_with(json!({})));
        registry.register("a", engine_with(json!({})));
        assert_eq!(registry.tenant_ids(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.get("a").is_none());
        assert!(registry.get("b").is_some());
    }
}
