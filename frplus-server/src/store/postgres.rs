use super::{Store, StoreError};
use crate::config::Config;
use crate::types::{
    AdminUser, ClientId, Factory, LineItem, NewAdmin, NewFactory, Order, OrderId, ProductId,
    ResetSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};
use std::time::Duration;
use tracing::info;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the pool and bring the schema up to date
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        info!("🔌 Connecting to Postgres...");
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600)) // 10 minutes
            .max_lifetime(Duration::from_secs(1800)) // 30 minutes
            .connect(&config.database_url)
            .await?;
        info!("✅ Connected to Postgres");

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("✅ Migrations applied");

        Ok(Self::new(pool))
    }
}

/// One row of the orders/order_items join. Item columns are NULL for an
/// order without items.
#[derive(Debug, Clone)]
struct OrderItemRow {
    order_id: OrderId,
    client_id: ClientId,
    issued_at: DateTime<Utc>,
    product_id: Option<ProductId>,
    quantity: Option<i32>,
    unit_price: Option<Decimal>,
}

impl OrderItemRow {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            order_id: row.try_get("order_id")?,
            client_id: row.try_get("client_id")?,
            issued_at: row.try_get("issued_at")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            unit_price: row.try_get("unit_price")?,
        })
    }
}

/// Fold join rows into orders. Rows of one order must be adjacent, which the
/// ORDER BY of `orders_for_client` guarantees; row order is preserved.
fn group_order_rows(rows: Vec<OrderItemRow>) -> Vec<Order> {
    let mut orders: Vec<Order> = Vec::new();

    for row in rows {
        let starts_new = orders.last().map_or(true, |o| o.id != row.order_id);
        if starts_new {
            orders.push(Order {
                id: row.order_id,
                client_id: row.client_id,
                issued_at: row.issued_at,
                items: Vec::new(),
            });
        }

        if let (Some(order), Some(product_id)) = (orders.last_mut(), row.product_id) {
            order.items.push(LineItem {
                product_id,
                quantity: row.quantity.unwrap_or(0),
                unit_price: row.unit_price,
            });
        }
    }

    orders
}

fn factory_from_row(row: &PgRow) -> Result<Factory, sqlx::Error> {
    Ok(Factory {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}

fn admin_from_row(row: &PgRow) -> Result<AdminUser, sqlx::Error> {
    Ok(AdminUser {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
    })
}

fn unique_violation(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(what.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_admin(&self) -> Result<Option<AdminUser>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE role = 'admin'
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(admin_from_row).transpose()?)
    }

    async fn insert_admin(&self, admin: NewAdmin) -> Result<AdminUser, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, 'admin')
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "User"))?;

        Ok(admin_from_row(&row)?)
    }

    async fn list_factories(&self) -> Result<Vec<Factory>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at
            FROM factories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let factories = rows
            .iter()
            .map(factory_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(factories)
    }

    async fn create_factory(&self, factory: NewFactory) -> Result<Factory, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO factories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(&factory.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Factory"))?;

        Ok(factory_from_row(&row)?)
    }

    async fn orders_for_client(&self, client_id: ClientId) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                o.id AS order_id, o.client_id, o.issued_at,
                i.product_id, i.quantity, i.unit_price
            FROM orders o
            LEFT JOIN order_items i ON i.order_id = o.id
            WHERE o.client_id = $1
            ORDER BY o.issued_at DESC, o.id ASC, i.id ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        let rows = rows
            .iter()
            .map(OrderItemRow::from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(group_order_rows(rows))
    }

    async fn reset_transactional_data(&self) -> Result<ResetSummary, StoreError> {
        let mut tx = self.pool.begin().await?;

        let order_items = sqlx::query("DELETE FROM order_items")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let orders = sqlx::query("DELETE FROM orders")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!("🗑️ Reset removed {} order items and {} orders", order_items, orders);
        Ok(ResetSummary {
            order_items,
            orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(order_id: OrderId, day: u32, item: Option<(ProductId, i64)>) -> OrderItemRow {
        OrderItemRow {
            order_id,
            client_id: 3,
            issued_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            product_id: item.map(|(p, _)| p),
            quantity: item.map(|_| 2),
            unit_price: item.map(|(_, cents)| Decimal::new(cents, 2)),
        }
    }

    #[test]
    fn test_group_empty() {
        assert!(group_order_rows(vec![]).is_empty());
    }

    #[test]
    fn test_group_keeps_row_order() {
        let orders = group_order_rows(vec![
            row(20, 9, Some((1, 1250))),
            row(20, 9, Some((2, 500))),
            row(10, 1, Some((1, 1000))),
        ]);

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, 20);
        assert_eq!(
            orders[0].items.iter().map(|i| i.product_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(orders[0].items[0].quantity, 2);
        assert_eq!(orders[1].id, 10);
        assert_eq!(orders[1].items[0].unit_price, Some(Decimal::new(1000, 2)));
    }

    #[test]
    fn test_group_order_without_items() {
        let orders = group_order_rows(vec![row(5, 2, None), row(4, 1, Some((8, 99)))]);

        assert_eq!(orders.len(), 2);
        assert!(orders[0].items.is_empty());
        assert_eq!(orders[1].items.len(), 1);
    }

    #[test]
    fn test_group_keeps_missing_price() {
        let mut r = row(1, 1, Some((4, 100)));
        r.unit_price = None;
        let orders = group_order_rows(vec![r]);

        assert_eq!(orders[0].items[0].unit_price, None);
    }
}
