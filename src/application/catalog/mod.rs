//! Catalog lifecycle: snapshot handle, per-tenant engine and registry

mod engine;
mod handle;
mod registry;

pub use engine::TariffEngine;
pub use handle::CatalogHandle;
pub use registry::{SharedTenantEngines, TenantEngines};
