pub mod postgres;

#[cfg(test)]
pub mod memory;

use crate::types::{AdminUser, ClientId, Factory, NewAdmin, NewFactory, Order, ResetSummary};
use async_trait::async_trait;
use thiserror::Error;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{0} already exists")]
    Duplicate(String),
}

/// Persistence behind the HTTP handlers.
///
/// Implementations hand back fully materialized rows; nothing downstream
/// performs its own fetching.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_admin(&self) -> Result<Option<AdminUser>, StoreError>;

    async fn insert_admin(&self, admin: NewAdmin) -> Result<AdminUser, StoreError>;

    /// All factories, by name
    async fn list_factories(&self) -> Result<Vec<Factory>, StoreError>;

    async fn create_factory(&self, factory: NewFactory) -> Result<Factory, StoreError>;

    /// Orders of one client with items attached, `issued_at DESC, id ASC`.
    /// Items follow their stored sequence. Unknown clients have no orders.
    async fn orders_for_client(&self, client_id: ClientId) -> Result<Vec<Order>, StoreError>;

    /// Delete order items, then orders, atomically.
    async fn reset_transactional_data(&self) -> Result<ResetSummary, StoreError>;
}
