//! In-memory settings store

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::domain::tariff::SettingsStore;
use crate::shared::errors::DomainResult;

/// In-memory tariff tree for development and testing
pub struct InMemorySettingsStore {
    tree: RwLock<Value>,
    save_counter: AtomicUsize,
}

impl InMemorySettingsStore {
    /// Store holding an empty tree with all three sections present
    pub fn new() -> Self {
        Self::with_tree(json!({
            "origins": {},
            "destinations": {},
            "shipping_rates": {}
        }))
    }

    pub fn with_tree(tree: Value) -> Self {
        Self {
            tree: RwLock::new(tree),
            save_counter: AtomicUsize::new(0),
        }
    }

    /// Number of whole-tree writes so far
    pub fn save_count(&self) -> usize {
        self.save_counter.load(Ordering::SeqCst)
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> DomainResult<Value> {
        Ok(self.tree.read().await.clone())
    }

    async fn save(&self, tree: &Value) -> DomainResult<()> {
        *self.tree.write().await = tree.clone();
        self.save_counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_replaces_whole_tree() {
        let store = InMemorySettingsStore::new();
        assert_eq!(store.load().await.unwrap()["shipping_rates"], json!({}));

        let tree = json!({ "origins": { "China": { "label": "China" } } });
        store.save(&tree).await.unwrap();

        assert_eq!(store.load().await.unwrap(), tree);
        assert_eq!(store.save_count(), 1);
    }
}
