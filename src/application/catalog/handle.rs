//! Atomically swapped catalog snapshot

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::info;

use crate::application::services::RouteResolver;
use crate::domain::tariff::{Catalog, CatalogOptions, SettingsStore};
use crate::shared::errors::DomainResult;

/// Holds the current catalog. Readers take an `Arc` snapshot and keep using
/// it for as long as they like; a reload builds a new catalog off to the side
/// and replaces the old one in a single assignment.
pub struct CatalogHandle {
    current: watch::Sender<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        let (current, _) = watch::channel(Arc::new(catalog));
        Self { current }
    }

    pub fn empty() -> Self {
        Self::new(Catalog::empty())
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.borrow().clone()
    }

    /// Resolver pinned to the current snapshot
    pub fn resolver(&self) -> RouteResolver {
        RouteResolver::new(self.snapshot())
    }

    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let catalog = Arc::new(catalog);
        self.current.send_replace(catalog.clone());
        catalog
    }

    /// Notified after every swap
    pub fn subscribe(&self) -> watch::Receiver<Arc<Catalog>> {
        self.current.subscribe()
    }

    /// Build from an already-loaded tree and swap it in
    pub fn load_tree(&self, tree: &Value, options: &CatalogOptions) -> DomainResult<Arc<Catalog>> {
        let catalog = Catalog::build(tree, options)?;
        Ok(self.replace(catalog))
    }

    /// Load the tree from the store and swap it in. On failure the previous
    /// snapshot stays active and the error is returned unchanged.
    pub async fn reload(
        &self,
        store: &dyn SettingsStore,
        options: &CatalogOptions,
    ) -> DomainResult<Arc<Catalog>> {
        let tree = store.load().await?;
        let catalog = self.load_tree(&tree, options)?;
        info!(routes = catalog.routes().len(), "Tariff catalog reloaded");
        Ok(catalog)
    }
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tariff::{RouteKey, TransportMode};
    use crate::shared::errors::DomainError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::json;
    use tokio::sync::Notify;

    fn tree(rate: u32) -> Value {
        json!({
            "shipping_rates": {
                "China_Cameroon": { "air_normal": { "currency": "USD", "normal": rate } }
            }
        })
    }

    fn normal_rate(catalog: &Catalog) -> Option<Decimal> {
        catalog
            .resolve_rate_item(&RouteKey::new("China", "Cameroon"), TransportMode::AirNormal, "normal")
            .map(|item| item.rate)
    }

    struct GatedStore {
        gate: Arc<Notify>,
        tree: Value,
    }

    #[async_trait]
    impl SettingsStore for GatedStore {
        async fn load(&self) -> DomainResult<Value> {
            self.gate.notified().await;
            Ok(self.tree.clone())
        }

        async fn save(&self, _tree: &Value) -> DomainResult<()> {
            Ok(())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl SettingsStore for BrokenStore {
        async fn load(&self) -> DomainResult<Value> {
            Err(DomainError::Storage("connection reset".into()))
        }

        async fn save(&self, _tree: &Value) -> DomainResult<()> {
            Err(DomainError::Storage("connection reset".into()))
        }
    }

    #[tokio::test]
    async fn readers_see_old_snapshot_until_reload_completes() {
        let handle = Arc::new(CatalogHandle::empty());
        handle.load_tree(&tree(10), &CatalogOptions::default()).unwrap();

        let gate = Arc::new(Notify::new());
        let store = GatedStore {
            gate: gate.clone(),
            tree: tree(12),
        };

        let reloading = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.reload(&store, &CatalogOptions::default()).await })
        };

        tokio::task::yield_now().await;
        assert_eq!(normal_rate(&handle.snapshot()), Some(Decimal::from(10)));

        gate.notify_one();
        reloading.await.unwrap().unwrap();
        assert_eq!(normal_rate(&handle.snapshot()), Some(Decimal::from(12)));
    }

    #[tokio::test]
    async fn pinned_snapshot_survives_swap() {
        let handle = CatalogHandle::empty();
        handle.load_tree(&tree(10), &CatalogOptions::default()).unwrap();
        let pinned = handle.snapshot();

        handle.load_tree(&tree(20), &CatalogOptions::default()).unwrap();
        assert_eq!(normal_rate(&pinned), Some(Decimal::from(10)));
        assert_eq!(normal_rate(&handle.snapshot()), Some(Decimal::from(20)));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot() {
        let handle = CatalogHandle::empty();
        handle.load_tree(&tree(10), &CatalogOptions::default()).unwrap();

        let err = handle
            .reload(&BrokenStore, &CatalogOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_store_failure());
        assert_eq!(normal_rate(&handle.snapshot()), Some(Decimal::from(10)));

        let err = handle
            .load_tree(&json!("not a tree"), &CatalogOptions::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::MalformedTree(_)));
        assert_eq!(normal_rate(&handle.snapshot()), Some(Decimal::from(10)));
    }

    #[tokio::test]
    async fn subscribers_are_notified_of_swaps() {
        let handle = CatalogHandle::empty();
        let mut rx = handle.subscribe();
        handle.load_tree(&tree(7), &CatalogOptions::default()).unwrap();

        rx.changed().await.unwrap();
        assert_eq!(normal_rate(&rx.borrow()), Some(Decimal::from(7)));
    }
}
