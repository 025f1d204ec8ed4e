use crate::config::{AdminSeed, ConfigError};
use crate::error::ApiError;
use crate::store::Store;
use crate::types::{NewAdmin, SeedOutcome};
use tracing::info;

/// Create the admin account unless one already exists
pub async fn seed_admin(store: &dyn Store, seed: &AdminSeed) -> Result<SeedOutcome, ApiError> {
    if let Some(existing) = store.find_admin().await? {
        info!("👤 Admin already present ({}), skipping seed", existing.email);
        return Ok(SeedOutcome {
            created: false,
            email: existing.email,
        });
    }

    let email = seed
        .email
        .clone()
        .ok_or(ConfigError::Missing("ADMIN_EMAIL"))?;
    let password_hash = seed
        .password_hash
        .clone()
        .ok_or(ConfigError::Missing("ADMIN_PASSWORD_HASH"))?;

    let admin = store
        .insert_admin(NewAdmin {
            name: seed.name.clone(),
            email,
            password_hash,
        })
        .await?;

    info!("✅ Admin {} created", admin.email);
    Ok(SeedOutcome {
        created: true,
        email: admin.email,
    })
}
