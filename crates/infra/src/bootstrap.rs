//! Permission bootstrap: persist the core catalog, then mirror storage into
//! the in-memory registry.

use dashbore_auth::{core_permissions, PermissionRegistry};

use crate::store::{PermissionStore, Store, StoreError};

/// Two sequential phases, safe to run repeatedly:
///
/// 1. Upsert every core permission into storage (keyed by unique name).
/// 2. Read back **all** persisted permissions — including any added
///    out-of-band — and load them into the registry.
///
/// Always invoked once at process start before serving traffic. The caller
/// decides whether a failure is fatal; at startup it is logged and the
/// process keeps going.
pub async fn bootstrap(store: &dyn Store, registry: &PermissionRegistry) -> Result<(), StoreError> {
    tracing::info!("loading core permissions");
    for permission in core_permissions() {
        store.upsert_permission(&permission).await?;
    }

    let permissions = store.all_permissions().await?;
    let names: Vec<&str> = permissions.iter().map(|p| p.name.as_str()).collect();
    tracing::info!(count = permissions.len(), permissions = names.join(", "), "loaded permissions into memory");

    registry.load(permissions);
    Ok(())
}
