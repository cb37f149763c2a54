use serde::{Deserialize, Serialize};

pub type CartId = i64;

/// A shopping cart. Orders point at it; it never owns their lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
}

/// Cart reference as carried by an incoming order request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartRef {
    pub cart_id: Option<CartId>,
}

impl CartRef {
    pub fn new(cart_id: CartId) -> Self {
        Self {
            cart_id: Some(cart_id),
        }
    }
}
