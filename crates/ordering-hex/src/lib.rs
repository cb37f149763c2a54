//! ordering-hex: order lifecycle core plus its inbound HTTP adapter

pub mod config;
pub mod errors;

pub mod application;

pub use ordering_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
