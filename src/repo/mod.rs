//! Persistence gateway: one repository per entity kind, all reached through a
//! unit of work so each service call commits or rolls back as a whole.

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::config::StorageKind;
use crate::error::AppError;
use crate::model::{Customer, CustomerId, Employee, EmployeeId, PetStore, StoreId};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxMode {
    /// Snapshot reads; nothing is written.
    ReadOnly,
    ReadWrite,
}

#[async_trait]
pub trait StoreRepository: Send {
    async fn find_store(&mut self, id: StoreId) -> Result<Option<PetStore>, AppError>;

    /// All stores, ordered by id.
    async fn find_all_stores(&mut self) -> Result<Vec<PetStore>, AppError>;

    /// Insert when `store.id` is `None`, otherwise update. Returns the stored row.
    async fn save_store(&mut self, store: &PetStore) -> Result<PetStore, AppError>;

    /// Delete the store row only. Fails while employees or customer links still reference it.
    async fn delete_store(&mut self, id: StoreId) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmployeeRepository: Send {
    async fn find_employee(&mut self, id: EmployeeId) -> Result<Option<Employee>, AppError>;

    async fn find_employees_by_store(&mut self, store_id: StoreId) -> Result<Vec<Employee>, AppError>;

    /// Insert when `employee.id` is `None`, otherwise update (including the owning store).
    async fn save_employee(&mut self, employee: &Employee) -> Result<Employee, AppError>;

    /// Returns the number of employees removed.
    async fn delete_employees_by_store(&mut self, store_id: StoreId) -> Result<u64, AppError>;
}

#[async_trait]
pub trait CustomerRepository: Send {
    /// Loads the customer together with its associated store ids.
    async fn find_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, AppError>;

    async fn find_customers_by_store(&mut self, store_id: StoreId) -> Result<Vec<Customer>, AppError>;

    /// Upserts the scalar fields, then records every association in
    /// `customer.store_ids` that is not stored yet. Existing associations are
    /// never removed here. Returns the customer with its full store set.
    async fn save_customer(&mut self, customer: &Customer) -> Result<Customer, AppError>;

    /// Removes every customer association of the store; customers are kept.
    async fn detach_customers_from_store(&mut self, store_id: StoreId) -> Result<u64, AppError>;
}

/// A transaction spanning all three repositories. Dropping it without
/// `commit` discards every change made through it.
#[async_trait]
pub trait UnitOfWork: StoreRepository + EmployeeRepository + CustomerRepository {
    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

#[async_trait]
pub trait Repository: Send + Sync {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn UnitOfWork>, AppError>;

    /// Cheap liveness check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;

    fn storage(&self) -> StorageKind;
}
