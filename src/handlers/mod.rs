//! HTTP handlers for pet stores, employees and customers.

pub mod pet_store;
pub use pet_store::*;
