//! Postgres order repository.
//!
//! Ownership lives in the WHERE clause of every statement here; there is no
//! separate existence check to race against.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use user_order_core::{NewOrder, Order, OrderRepository, Page, RepoError, RepoResult};

use super::{to_u32, translate};

const SELECT_COLUMNS: &str =
    "id, user_id, product_name, quantity, price, created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    product_name: String,
    quantity: i32,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_domain(self) -> RepoResult<Order> {
        Ok(Order {
            id: to_u32(self.id, "order id")?,
            user_id: to_u32(self.user_id, "user id")?,
            product_name: self.product_name,
            quantity: to_u32(self.quantity, "quantity")?,
            price: self.price,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> RepoResult<Order> {
        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (user_id, product_name, quantity, price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(order.user_id as i32)
        .bind(&order.product_name)
        .bind(order.quantity as i32)
        .bind(order.price)
        .fetch_one(&self.pool)
        .await
        .map_err(translate)?;

        row.into_domain()
    }

    async fn get_by_id(&self, order_id: u32, owner_id: u32) -> RepoResult<Order> {
        if order_id == 0 || owner_id == 0 {
            return Err(RepoError::NotFound);
        }

        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        ))
        .bind(order_id as i32)
        .bind(owner_id as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(translate)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn list_by_user(&self, owner_id: u32, offset: u64, limit: u32) -> RepoResult<Page<Order>> {
        let total: i64 = sqlx::query(
            "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(translate)?
        .try_get(0)
        .map_err(translate)?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders \
             WHERE user_id = $1 AND deleted_at IS NULL \
             ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id as i32)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(translate)?;

        let items = rows
            .into_iter()
            .map(OrderRow::into_domain)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
        })
    }

    async fn update(&self, order: &Order) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET product_name = $3, quantity = $4, price = $5, updated_at = now() \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(order.id as i32)
        .bind(order.user_id as i32)
        .bind(&order.product_name)
        .bind(order.quantity as i32)
        .bind(order.price)
        .execute(&self.pool)
        .await
        .map_err(translate)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NoRowsAffected);
        }
        Ok(())
    }

    async fn delete(&self, order_id: u32, owner_id: u32) -> RepoResult<()> {
        if order_id == 0 || owner_id == 0 {
            return Err(RepoError::NotFound);
        }

        let result = sqlx::query(
            "UPDATE orders SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(order_id as i32)
        .bind(owner_id as i32)
        .execute(&self.pool)
        .await
        .map_err(translate)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
