//! Seed data: the Admin role with the wildcard grant, the admin user, and —
//! outside production — a plain user without roles.
//!
//! Every step is an upsert on a unique key, so the seed can run on every
//! start. Assumes `bootstrap` has persisted the core permissions.

use anyhow::{anyhow, Context, Result};

use dashbore_auth::{hash_password, WILDCARD};

use crate::store::{PermissionStore, Store, UserStore};

const ADMIN_EMAIL: &str = "dashbore@test.com";
const ADMIN_PASSWORD: &str = "dashbore";
const PLAIN_EMAIL: &str = "user@test.com";
const PLAIN_PASSWORD: &str = "user";

/// Run the full seed. `production` gates the throwaway plain user.
pub async fn seed(store: &dyn Store, production: bool) -> Result<()> {
    create_admin_role(store).await?;
    create_admin_user(store).await?;
    create_plain_user(store, production).await?;
    Ok(())
}

/// Ensure the `Admin` role exists and holds the wildcard permission.
///
/// The wildcard is looked up by its unique name, so a pre-existing row with
/// a different id still resolves.
async fn create_admin_role(store: &dyn Store) -> Result<()> {
    let permission = store
        .find_permission_by_name(WILDCARD)
        .await?
        .ok_or_else(|| anyhow!("wildcard permission not found; run bootstrap first"))?;

    let role = store.upsert_role("Admin").await?;
    store.grant_role_permission(role.id, permission.id).await?;
    Ok(())
}

async fn create_admin_user(store: &dyn Store) -> Result<()> {
    let role = store
        .find_role_by_name("Admin")
        .await?
        .ok_or_else(|| anyhow!("Admin role not found"))?;

    let hash = hash_password(ADMIN_PASSWORD).context("hashing admin password")?;
    let user = store
        .upsert_user(ADMIN_EMAIL, Some("Dashbore Admin"), &hash)
        .await?;
    store.assign_user_role(user.id, role.id).await?;

    tracing::info!(email = ADMIN_EMAIL, "admin user ready");
    Ok(())
}

async fn create_plain_user(store: &dyn Store, production: bool) -> Result<()> {
    if production {
        tracing::info!("skipping plain user creation in production");
        return Ok(());
    }

    let hash = hash_password(PLAIN_PASSWORD).context("hashing plain user password")?;
    store.upsert_user(PLAIN_EMAIL, None, &hash).await?;

    tracing::info!(email = PLAIN_EMAIL, "plain user ready");
    Ok(())
}
