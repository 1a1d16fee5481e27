//! In-process repositories. Read units of work share a read lock; a write unit
//! of work holds the write lock and operates on a private copy of the state
//! that replaces the shared state on commit, so a dropped unit of work leaves
//! nothing behind.

use super::{CustomerRepository, EmployeeRepository, Repository, StoreRepository, TxMode, UnitOfWork};
use crate::config::StorageKind;
use crate::error::AppError;
use crate::model::{Customer, CustomerId, Employee, EmployeeId, PetStore, StoreId};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

#[derive(Clone, Debug, Default)]
struct MemoryState {
    last_store_id: i64,
    last_employee_id: i64,
    last_customer_id: i64,
    stores: BTreeMap<StoreId, PetStore>,
    employees: BTreeMap<EmployeeId, Employee>,
    /// Scalar fields only; store sets are derived from `links`.
    customers: BTreeMap<CustomerId, Customer>,
    links: BTreeSet<(StoreId, CustomerId)>,
}

impl MemoryState {
    fn customer_with_stores(&self, customer: &Customer, id: CustomerId) -> Customer {
        let mut out = customer.clone();
        out.id = Some(id);
        out.store_ids = self
            .links
            .iter()
            .filter(|(_, c)| *c == id)
            .map(|(s, _)| *s)
            .collect();
        out
    }

    fn referenced_store(&self, id: StoreId) -> Result<(), AppError> {
        if self.stores.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::store_not_found(id))
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn UnitOfWork>, AppError> {
        let guard = match mode {
            TxMode::ReadOnly => Guard::Read(self.state.clone().read_owned().await),
            TxMode::ReadWrite => Guard::Write(self.state.clone().write_owned().await),
        };
        let working = match &guard {
            Guard::Read(g) => MemoryState::clone(g),
            Guard::Write(g) => MemoryState::clone(g),
        };
        Ok(Box::new(MemoryUnitOfWork { guard, working }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn storage(&self) -> StorageKind {
        StorageKind::Memory
    }
}

/// Held for the whole unit of work; only a write guard can publish.
enum Guard {
    Read(OwnedRwLockReadGuard<MemoryState>),
    Write(OwnedRwLockWriteGuard<MemoryState>),
}

pub struct MemoryUnitOfWork {
    guard: Guard,
    working: MemoryState,
}

#[async_trait]
impl StoreRepository for MemoryUnitOfWork {
    async fn find_store(&mut self, id: StoreId) -> Result<Option<PetStore>, AppError> {
        Ok(self.working.stores.get(&id).cloned())
    }

    async fn find_all_stores(&mut self) -> Result<Vec<PetStore>, AppError> {
        Ok(self.working.stores.values().cloned().collect())
    }

    async fn save_store(&mut self, store: &PetStore) -> Result<PetStore, AppError> {
        let id = match store.id {
            Some(id) => {
                self.working.referenced_store(id)?;
                id
            }
            None => {
                self.working.last_store_id += 1;
                StoreId::new(self.working.last_store_id)
            }
        };
        let mut saved = store.clone();
        saved.id = Some(id);
        self.working.stores.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_store(&mut self, id: StoreId) -> Result<(), AppError> {
        self.working.referenced_store(id)?;
        let has_employees = self.working.employees.values().any(|e| e.store_id == id);
        let has_links = self.working.links.iter().any(|(s, _)| *s == id);
        if has_employees || has_links {
            return Err(AppError::Conflict(format!(
                "Pet store with ID={} is still referenced by employees or customers.",
                id
            )));
        }
        self.working.stores.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryUnitOfWork {
    async fn find_employee(&mut self, id: EmployeeId) -> Result<Option<Employee>, AppError> {
        Ok(self.working.employees.get(&id).cloned())
    }

    async fn find_employees_by_store(&mut self, store_id: StoreId) -> Result<Vec<Employee>, AppError> {
        Ok(self
            .working
            .employees
            .values()
            .filter(|e| e.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn save_employee(&mut self, employee: &Employee) -> Result<Employee, AppError> {
        self.working.referenced_store(employee.store_id)?;
        let id = match employee.id {
            Some(id) if self.working.employees.contains_key(&id) => id,
            Some(id) => return Err(AppError::employee_not_found(id)),
            None => {
                self.working.last_employee_id += 1;
                EmployeeId::new(self.working.last_employee_id)
            }
        };
        let mut saved = employee.clone();
        saved.id = Some(id);
        self.working.employees.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_employees_by_store(&mut self, store_id: StoreId) -> Result<u64, AppError> {
        let before = self.working.employees.len();
        self.working.employees.retain(|_, e| e.store_id != store_id);
        Ok((before - self.working.employees.len()) as u64)
    }
}

#[async_trait]
impl CustomerRepository for MemoryUnitOfWork {
    async fn find_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, AppError> {
        let state = &self.working;
        Ok(state
            .customers
            .get(&id)
            .map(|c| state.customer_with_stores(c, id)))
    }

    async fn find_customers_by_store(&mut self, store_id: StoreId) -> Result<Vec<Customer>, AppError> {
        let state = &self.working;
        Ok(state
            .links
            .iter()
            .filter(|(s, _)| *s == store_id)
            .filter_map(|(_, id)| state.customers.get(id).map(|c| state.customer_with_stores(c, *id)))
            .collect())
    }

    async fn save_customer(&mut self, customer: &Customer) -> Result<Customer, AppError> {
        for store_id in &customer.store_ids {
            self.working.referenced_store(*store_id)?;
        }
        let id = match customer.id {
            Some(id) if self.working.customers.contains_key(&id) => id,
            Some(id) => return Err(AppError::customer_not_found(id)),
            None => {
                self.working.last_customer_id += 1;
                CustomerId::new(self.working.last_customer_id)
            }
        };
        let mut scalars = customer.clone();
        scalars.id = Some(id);
        scalars.store_ids.clear();
        self.working.customers.insert(id, scalars);
        for store_id in &customer.store_ids {
            self.working.links.insert((*store_id, id));
        }
        let state = &self.working;
        let stored = state
            .customers
            .get(&id)
            .map(|c| state.customer_with_stores(c, id))
            .ok_or_else(|| AppError::customer_not_found(id))?;
        Ok(stored)
    }

    async fn detach_customers_from_store(&mut self, store_id: StoreId) -> Result<u64, AppError> {
        let before = self.working.links.len();
        self.working.links.retain(|(s, _)| *s != store_id);
        Ok((before - self.working.links.len()) as u64)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryUnitOfWork { guard, working } = *self;
        if let Guard::Write(mut guard) = guard {
            *guard = working;
        }
        Ok(())
    }
}
