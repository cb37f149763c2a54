use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::{CartId, CartRef};
use crate::domain::error::DomainError;

pub type OrderId = i64;

/// Order lifecycle. Progression is forward only and `InPayment` is final here:
/// once payment starts the order can no longer advance or be cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Ordered,
    InPayment,
}

impl OrderStatus {
    pub fn next(self) -> Option<Self> {
        match self {
            OrderStatus::Created => Some(OrderStatus::Ordered),
            OrderStatus::Ordered => Some(OrderStatus::InPayment),
            OrderStatus::InPayment => None,
        }
    }

    pub fn is_payment_locked(self) -> bool {
        matches!(self, OrderStatus::InPayment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Ordered => "ORDERED",
            OrderStatus::InPayment => "IN_PAYMENT",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(OrderStatus::Created),
            "ORDERED" => Ok(OrderStatus::Ordered),
            "IN_PAYMENT" => Ok(OrderStatus::InPayment),
            other => Err(DomainError::InvalidArgument(format!(
                "unknown order status {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub order_date: DateTime<Utc>,
    pub description: String,
    pub fee: Decimal,
    pub status: OrderStatus,
    pub active: bool,
    pub cart_id: CartId,
    pub updated_at: DateTime<Utc>,
}

/// An order that has passed validation but has no store-assigned id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    order_date: DateTime<Utc>,
    description: String,
    fee: Decimal,
    cart_id: CartId,
}

/// Body of an order creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub description: String,
    pub fee: Decimal,
    #[serde(default)]
    pub cart: Option<CartRef>,
}

/// Partial update; absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
}

fn check_fee(fee: Decimal) -> Result<Decimal, DomainError> {
    if fee < Decimal::ZERO {
        return Err(DomainError::InvalidArgument(format!(
            "order fee must not be negative, got {fee}"
        )));
    }
    Ok(fee)
}

impl NewOrder {
    pub fn new(description: String, fee: Decimal, cart_id: CartId) -> Result<Self, DomainError> {
        let fee = check_fee(fee)?;
        Ok(Self {
            order_date: Utc::now(),
            description,
            fee,
            cart_id,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Materialises the order under the id a store handed out.
    pub fn assign_id(self, id: OrderId) -> Order {
        Order {
            id,
            order_date: self.order_date,
            description: self.description,
            fee: self.fee,
            status: OrderStatus::Created,
            active: true,
            cart_id: self.cart_id,
            updated_at: self.order_date,
        }
    }
}

impl Order {
    /// Moves the order one step forward and returns the new status.
    pub fn advance_status(&mut self) -> Result<OrderStatus, DomainError> {
        let next = self.status.next().ok_or(DomainError::InvalidState {
            id: self.id,
            status: self.status,
            action: "advanced",
        })?;
        self.status = next;
        self.touch();
        Ok(next)
    }

    /// Soft delete. The flag never flips back.
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if self.status.is_payment_locked() {
            return Err(DomainError::InvalidState {
                id: self.id,
                status: self.status,
                action: "cancelled",
            });
        }
        self.active = false;
        self.touch();
        Ok(())
    }

    /// Copies description and fee from the patch; cart, status and the
    /// active flag are never touched.
    pub fn apply(&mut self, patch: OrderPatch) -> Result<(), DomainError> {
        let fee = patch.fee.map(check_fee).transpose()?;
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(fee) = fee {
            self.fee = fee;
        }
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn created_order() -> Order {
        NewOrder::new("Test order".into(), dec!(100.0), 1)
            .unwrap()
            .assign_id(1)
    }

    #[test]
    fn new_order_defaults_created_and_active() {
        let order = created_order();
        assert_eq!(order.id, 1);
        assert_eq!(order.status, OrderStatus::Created);
        assert!(order.active);
        assert_eq!(order.cart_id, 1);
        assert_eq!(order.fee, dec!(100.0));
    }

    #[test]
    fn negative_fee_is_rejected() {
        let res = NewOrder::new("x".into(), dec!(-0.01), 1);
        assert!(matches!(res, Err(DomainError::InvalidArgument(_))));

        assert!(NewOrder::new("free".into(), Decimal::ZERO, 1).is_ok());
    }

    #[test]
    fn status_only_moves_forward() {
        let mut order = created_order();
        assert_eq!(order.advance_status().unwrap(), OrderStatus::Ordered);
        assert_eq!(order.advance_status().unwrap(), OrderStatus::InPayment);

        let err = order.advance_status().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidState {
                id: 1,
                status: OrderStatus::InPayment,
                action: "advanced",
            }
        );
        assert_eq!(order.status, OrderStatus::InPayment);
    }

    #[test]
    fn deactivate_respects_payment_lock() {
        let mut order = created_order();
        order.advance_status().unwrap();
        order.deactivate().unwrap();
        assert!(!order.active);

        let mut paying = created_order();
        paying.status = OrderStatus::InPayment;
        assert!(matches!(
            paying.deactivate(),
            Err(DomainError::InvalidState { .. })
        ));
        assert!(paying.active);
    }

    #[test]
    fn apply_patch_keeps_cart_and_status() {
        let mut order = created_order();
        let before = order.updated_at;
        order
            .apply(OrderPatch {
                description: Some("Updated order".into()),
                fee: Some(dec!(200.0)),
            })
            .unwrap();
        assert_eq!(order.description, "Updated order");
        assert_eq!(order.fee, dec!(200.0));
        assert_eq!(order.cart_id, 1);
        assert_eq!(order.status, OrderStatus::Created);
        assert!(order.updated_at >= before);

        order
            .apply(OrderPatch {
                description: None,
                fee: Some(dec!(50)),
            })
            .unwrap();
        assert_eq!(order.description, "Updated order");
        assert_eq!(order.fee, dec!(50));
    }

    #[test]
    fn apply_rejects_negative_fee_without_partial_write() {
        let mut order = created_order();
        let res = order.apply(OrderPatch {
            description: Some("changed".into()),
            fee: Some(dec!(-5)),
        });
        assert!(res.is_err());
        assert_eq!(order.description, "Test order");
        assert_eq!(order.fee, dec!(100.0));
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InPayment).unwrap(),
            "\"IN_PAYMENT\""
        );
        assert_eq!("ORDERED".parse::<OrderStatus>().unwrap(), OrderStatus::Ordered);
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }
}
