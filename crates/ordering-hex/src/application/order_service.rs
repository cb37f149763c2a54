use crate::errors::AppError;
use ordering_types::domain::cart::{Cart, CartId};
use ordering_types::domain::order::{NewOrder, NewOrderRequest, Order, OrderId, OrderPatch};
use ordering_types::ports::cart_store::CartStore;
use ordering_types::ports::order_store::OrderStore;
use tracing::{info, instrument, warn};

/// Order lifecycle rules on top of the order and cart stores.
///
/// Every precondition is checked before the store is written to, so a
/// rejected call never leaves a partial update behind.
pub struct OrderService<S: OrderStore, C: CartStore> {
    orders: S,
    carts: C,
}

impl<S: OrderStore, C: CartStore> OrderService<S, C> {
    pub fn new(orders: S, carts: C) -> Self {
        Self { orders, carts }
    }

    pub async fn find_by_id(&self, id: OrderId) -> Result<Order, AppError> {
        self.orders
            .find_active_by_id(id)
            .await?
            .ok_or(AppError::OrderNotFound(id))
    }

    pub async fn find_all(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.find_all_active().await?)
    }

    #[instrument(skip_all)]
    pub async fn save(&self, request: NewOrderRequest) -> Result<Order, AppError> {
        let cart_id = request
            .cart
            .and_then(|c| c.cart_id)
            .ok_or_else(|| AppError::InvalidArgument("order must reference a cart".into()))?;
        let draft = NewOrder::new(request.description, request.fee, cart_id)?;

        if self.carts.find_cart(cart_id).await?.is_none() {
            warn!(cart_id, "order rejected, cart does not exist");
            return Err(AppError::CartNotFound(cart_id));
        }

        let order = self.orders.create(draft).await?;
        info!(order_id = order.id, cart_id, "order created");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId) -> Result<Order, AppError> {
        let mut order = self.find_by_id(id).await?;
        let previous = order.status;
        if let Err(e) = order.advance_status() {
            warn!(order_id = id, status = %previous, "status change rejected");
            return Err(e.into());
        }

        let saved = self.orders.save(order).await?;
        info!(order_id = id, from = %previous, to = %saved.status, "order status advanced");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: OrderId) -> Result<(), AppError> {
        let mut order = self.find_by_id(id).await?;
        if let Err(e) = order.deactivate() {
            warn!(order_id = id, status = %order.status, "cancellation rejected");
            return Err(e.into());
        }

        self.orders.save(order).await?;
        info!(order_id = id, "order deactivated");
        Ok(())
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: OrderId, patch: OrderPatch) -> Result<Order, AppError> {
        let mut order = self.find_by_id(id).await?;
        order.apply(patch)?;
        let saved = self.orders.save(order).await?;
        info!(order_id = id, "order updated");
        Ok(saved)
    }

    pub async fn open_cart(&self) -> Result<Cart, AppError> {
        let cart = self.carts.create_cart().await?;
        info!(cart_id = cart.id, "cart opened");
        Ok(cart)
    }

    pub async fn find_cart(&self, id: CartId) -> Result<Cart, AppError> {
        self.carts
            .find_cart(id)
            .await?
            .ok_or(AppError::CartNotFound(id))
    }
}
