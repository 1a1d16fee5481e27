//! PetStoreService: store, employee and customer management on top of the
//! repository gateway. Every public operation runs in exactly one unit of work.

mod customer;
mod employee;
mod store;

use crate::config::{DeletePolicy, StorageKind};
use crate::error::AppError;
use crate::repo::{Repository, TxMode, UnitOfWork};
use std::sync::Arc;

#[derive(Clone)]
pub struct PetStoreService {
    repo: Arc<dyn Repository>,
    delete_policy: DeletePolicy,
}

impl PetStoreService {
    pub fn new(repo: Arc<dyn Repository>, delete_policy: DeletePolicy) -> Self {
        PetStoreService { repo, delete_policy }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    pub fn storage(&self) -> StorageKind {
        self.repo.storage()
    }

    /// Storage liveness, for readiness checks.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repo.ping().await
    }

    async fn begin_write(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        self.repo.begin(TxMode::ReadWrite).await
    }

    async fn begin_read(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        self.repo.begin(TxMode::ReadOnly).await
    }
}
