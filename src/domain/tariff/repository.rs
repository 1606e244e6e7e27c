//! Settings store port for the raw tariff tree

use async_trait::async_trait;
use serde_json::Value;

use crate::shared::errors::DomainResult;

/// Holds the tenant's whole tariff tree. Reads and writes are always the
/// complete tree; there are no per-route writes.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> DomainResult<Value>;
    async fn save(&self, tree: &Value) -> DomainResult<()>;
}
