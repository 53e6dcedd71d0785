//! Adapter implementations for the planning repository port.

pub mod memory;
pub mod postgres;
