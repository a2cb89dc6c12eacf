//! Request handlers, one module per workflow.

pub mod health;
pub mod identity;
pub mod mortgages;
pub mod offplan;
pub mod properties;
pub mod transactions;
