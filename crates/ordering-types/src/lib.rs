//! ordering-types: domain model and ports shared by the ordering crates.

pub mod domain;
pub mod ports;
