use super::{Store, StoreError};
use crate::types::{AdminUser, ClientId, Factory, NewAdmin, NewFactory, Order, ResetSummary};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// In-memory store for handler tests
#[derive(Default)]
pub struct MemoryStore {
    pub admins: Mutex<Vec<AdminUser>>,
    pub factories: Mutex<Vec<Factory>>,
    pub orders: Mutex<Vec<Order>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Mutex::new(orders),
            ..Default::default()
        }
    }

    /// Every call fails like an unreachable database
    pub fn failing() -> Self {
        let store = Self::default();
        store.failing.store(true, Ordering::SeqCst);
        store
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_admin(&self) -> Result<Option<AdminUser>, StoreError> {
        self.check()?;
        Ok(self.admins.lock().await.first().cloned())
    }

    async fn insert_admin(&self, admin: NewAdmin) -> Result<AdminUser, StoreError> {
        self.check()?;
        let mut admins = self.admins.lock().await;
        if admins.iter().any(|a| a.email == admin.email) {
            return Err(StoreError::Duplicate("User".to_string()));
        }
        let user = AdminUser {
            id: admins.len() as i64 + 1,
            name: admin.name,
            email: admin.email,
            created_at: Utc::now(),
        };
        admins.push(user.clone());
        Ok(user)
    }

    async fn list_factories(&self) -> Result<Vec<Factory>, StoreError> {
        self.check()?;
        let mut factories = self.factories.lock().await.clone();
        factories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(factories)
    }

    async fn create_factory(&self, factory: NewFactory) -> Result<Factory, StoreError> {
        self.check()?;
        let mut factories = self.factories.lock().await;
        if factories.iter().any(|f| f.name == factory.name) {
            return Err(StoreError::Duplicate("Factory".to_string()));
        }
        let created = Factory {
            id: factories.len() as i64 + 1,
            name: factory.name,
            created_at: Utc::now(),
        };
        factories.push(created.clone());
        Ok(created)
    }

    async fn orders_for_client(&self, client_id: ClientId) -> Result<Vec<Order>, StoreError> {
        self.check()?;
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .await
            .iter()
            .filter(|o| o.client_id == client_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    async fn reset_transactional_data(&self) -> Result<ResetSummary, StoreError> {
        self.check()?;
        let mut orders = self.orders.lock().await;
        let summary = ResetSummary {
            order_items: orders.iter().map(|o| o.items.len() as u64).sum(),
            orders: orders.len() as u64,
        };
        orders.clear();
        Ok(summary)
    }
}
