use async_trait::async_trait;

use crate::domain::cart::{Cart, CartId};
use crate::ports::order_store::RepoError;

#[async_trait]
pub trait CartStore: Send + Sync + 'static {
    async fn find_cart(&self, id: CartId) -> Result<Option<Cart>, RepoError>;
    async fn create_cart(&self) -> Result<Cart, RepoError>;
}
