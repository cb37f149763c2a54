use thiserror::Error;

use crate::domain::order::{OrderId, OrderStatus};

/// Rule violations detected by the domain model before anything is persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("order {id} is {status} and cannot be {action}")]
    InvalidState {
        id: OrderId,
        status: OrderStatus,
        action: &'static str,
    },
}
