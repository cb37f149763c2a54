use async_trait::async_trait;
use dashmap::DashMap;
use ordering_types::domain::cart::{Cart, CartId};
use ordering_types::domain::order::{NewOrder, Order, OrderId};
use ordering_types::ports::cart_store::CartStore;
use ordering_types::ports::order_store::{OrderStore, RepoError};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Process-local store. Clones share the same tables.
#[derive(Clone)]
pub struct InMemoryRepo {
    pub orders: Arc<DashMap<OrderId, Order>>,
    pub carts: Arc<DashMap<CartId, Cart>>,
    order_seq: Arc<AtomicI64>,
    cart_seq: Arc<AtomicI64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(DashMap::new()),
            carts: Arc::new(DashMap::new()),
            order_seq: Arc::new(AtomicI64::new(0)),
            cart_seq: Arc::new(AtomicI64::new(0)),
        }
    }

    fn sorted(mut orders: Vec<Order>) -> Vec<Order> {
        orders.sort_by_key(|o| o.id);
        orders
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryRepo {
    async fn find_active_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        Ok(self
            .orders
            .get(&id)
            .filter(|r| r.active)
            .map(|r| r.clone()))
    }

    async fn find_all_active(&self) -> Result<Vec<Order>, RepoError> {
        Ok(Self::sorted(
            self.orders
                .iter()
                .filter(|kv| kv.value().active)
                .map(|kv| kv.value().clone())
                .collect(),
        ))
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(&id).map(|r| r.clone()))
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        if !self.carts.contains_key(&order.cart_id()) {
            return Err(RepoError::DbError(format!(
                "cart {} does not exist",
                order.cart_id()
            )));
        }
        let id = self.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let order = order.assign_id(id);
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn save(&self, order: Order) -> Result<Order, RepoError> {
        match self.orders.get_mut(&order.id) {
            Some(mut stored) => {
                *stored = order.clone();
                Ok(order)
            }
            None => Err(RepoError::Missing(order.id)),
        }
    }
}

#[async_trait]
impl CartStore for InMemoryRepo {
    async fn find_cart(&self, id: CartId) -> Result<Option<Cart>, RepoError> {
        Ok(self.carts.get(&id).map(|r| *r))
    }

    async fn create_cart(&self) -> Result<Cart, RepoError> {
        let id = self.cart_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let cart = Cart { id };
        self.carts.insert(id, cart);
        Ok(cart)
    }
}
