use async_trait::async_trait;

use crate::domain::order::{NewOrder, Order, OrderId};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),

    #[error("no stored order with id {0}")]
    Missing(OrderId),
}

/// Persistence for orders. Soft-deleted rows stay in the store; only the
/// `*_active` queries hide them.
#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    async fn find_active_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError>;
    async fn find_all_active(&self) -> Result<Vec<Order>, RepoError>;
    /// Unfiltered lookup, inactive orders included.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError>;
    /// Fails with `DbError` when the referenced cart is not stored.
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError>;
    async fn save(&self, order: Order) -> Result<Order, RepoError>;
}
