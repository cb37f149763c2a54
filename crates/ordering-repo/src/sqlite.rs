use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ordering_types::domain::cart::{Cart, CartId};
use ordering_types::domain::order::{NewOrder, Order, OrderId, OrderStatus};
use ordering_types::ports::cart_store::CartStore;
use ordering_types::ports::order_store::{OrderStore, RepoError};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

const ORDER_COLUMNS: &str =
    "id, order_date, description, fee, status, active, cart_id, updated_at";

#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbOrder {
    id: i64,
    order_date: String,
    description: String,
    fee: String,
    status: String,
    active: bool,
    cart_id: i64,
    updated_at: String,
}

fn db_err(e: impl ToString) -> RepoError {
    RepoError::DbError(e.to_string())
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(db_err)?
        .with_timezone(&Utc))
}

impl DbOrder {
    fn into_order(self) -> Result<Order, RepoError> {
        Ok(Order {
            id: self.id,
            order_date: parse_ts(&self.order_date)?,
            description: self.description,
            fee: Decimal::from_str(&self.fee).map_err(db_err)?,
            status: OrderStatus::from_str(&self.status).map_err(db_err)?,
            active: self.active,
            cart_id: self.cart_id,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // On-disk databases need their directory; in-memory ones do not.
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_orders.sql");
        sqlx::query(ddl).execute(&pool).await?;
        tracing::debug!(url = database_url, "sqlite order store ready");

        Ok(Self { pool })
    }

    async fn fetch_one_where(&self, filter: &str, id: OrderId) -> Result<Option<Order>, RepoError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE {filter}");
        let row: Option<DbOrder> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(DbOrder::into_order).transpose()
    }
}

#[async_trait]
impl OrderStore for SqliteRepo {
    async fn find_active_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        self.fetch_one_where("id = ? AND active = 1", id).await
    }

    async fn find_all_active(&self) -> Result<Vec<Order>, RepoError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE active = 1 ORDER BY id");
        let rows: Vec<DbOrder> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(DbOrder::into_order)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        self.fetch_one_where("id = ?", id).await
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        let order_date = order.order_date().to_rfc3339();
        let res = sqlx::query(
            "INSERT INTO orders (order_date, description, fee, status, active, cart_id, updated_at)
             VALUES (?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&order_date)
        .bind(order.description())
        .bind(order.fee().to_string())
        .bind(OrderStatus::Created.as_str())
        .bind(order.cart_id())
        .bind(&order_date)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(order.assign_id(res.last_insert_rowid()))
    }

    async fn save(&self, order: Order) -> Result<Order, RepoError> {
        // order_date and cart_id are fixed at insert time.
        let res = sqlx::query(
            "UPDATE orders SET description = ?, fee = ?, status = ?, active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&order.description)
        .bind(order.fee.to_string())
        .bind(order.status.as_str())
        .bind(order.active)
        .bind(order.updated_at.to_rfc3339())
        .bind(order.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(RepoError::Missing(order.id));
        }
        Ok(order)
    }
}

#[async_trait]
impl CartStore for SqliteRepo {
    async fn find_cart(&self, id: CartId) -> Result<Option<Cart>, RepoError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM carts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(|(id,)| Cart { id }))
    }

    async fn create_cart(&self) -> Result<Cart, RepoError> {
        let res = sqlx::query("INSERT INTO carts DEFAULT VALUES")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(Cart {
            id: res.last_insert_rowid(),
        })
    }
}
