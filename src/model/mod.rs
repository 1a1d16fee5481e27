//! Domain types: ids, persisted entities, request inputs and response projections.

pub mod entity;
pub mod id;
pub mod input;
pub mod projection;

pub use entity::{Customer, Employee, PetStore};
pub use id::{CustomerId, EmployeeId, StoreId, Target};
pub use input::{CustomerInput, EmployeeInput, StoreInput};
pub use projection::{DeletionMessage, PetStoreCustomer, PetStoreData, PetStoreEmployee};
