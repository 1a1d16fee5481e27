use super::PetStoreService;
use crate::config::DeletePolicy;
use crate::error::AppError;
use crate::model::{DeletionMessage, PetStore, PetStoreData, StoreId, StoreInput, Target};
use crate::repo::UnitOfWork;

/// Load a store or fail with NotFound.
pub(crate) async fn find_store_by_id(tx: &mut dyn UnitOfWork, id: StoreId) -> Result<PetStore, AppError> {
    tx.find_store(id)
        .await?
        .ok_or_else(|| AppError::store_not_found(id))
}

async fn load_detailed(tx: &mut dyn UnitOfWork, store: PetStore) -> Result<PetStoreData, AppError> {
    let Some(id) = store.id else {
        return Ok(PetStoreData::summary(store));
    };
    let employees = tx.find_employees_by_store(id).await?;
    let customers = tx.find_customers_by_store(id).await?;
    Ok(PetStoreData::detailed(store, &employees, &customers))
}

impl PetStoreService {
    /// Create a store, or overwrite every field of an existing one.
    pub async fn save_pet_store(&self, input: StoreInput) -> Result<PetStoreData, AppError> {
        let mut tx = self.begin_write().await?;
        let mut store = match input.target() {
            Target::New => PetStore::default(),
            Target::Existing(id) => find_store_by_id(tx.as_mut(), id).await?,
        };
        input.copy_into(&mut store);

        let saved = tx.save_store(&store).await?;
        let data = load_detailed(tx.as_mut(), saved).await?;
        tx.commit().await?;
        tracing::debug!(pet_store_id = ?data.pet_store_id, "pet store saved");
        Ok(data)
    }

    /// One store with its employees and customers.
    pub async fn retrieve_pet_store_by_id(&self, id: StoreId) -> Result<PetStoreData, AppError> {
        let mut tx = self.begin_read().await?;
        let store = find_store_by_id(tx.as_mut(), id).await?;
        let data = load_detailed(tx.as_mut(), store).await?;
        tx.commit().await?;
        Ok(data)
    }

    /// Every store, without employee or customer collections.
    pub async fn retrieve_all_pet_stores(&self) -> Result<Vec<PetStoreData>, AppError> {
        let mut tx = self.begin_read().await?;
        let stores = tx.find_all_stores().await?;
        tx.commit().await?;
        Ok(stores.into_iter().map(PetStoreData::summary).collect())
    }

    /// Delete a store according to the configured [`DeletePolicy`].
    pub async fn delete_pet_store_by_id(&self, id: StoreId) -> Result<DeletionMessage, AppError> {
        let mut tx = self.begin_write().await?;
        find_store_by_id(tx.as_mut(), id).await?;

        match self.delete_policy {
            DeletePolicy::Cascade => {
                let employees = tx.delete_employees_by_store(id).await?;
                let links = tx.detach_customers_from_store(id).await?;
                tracing::debug!(
                    pet_store_id = %id,
                    employees_deleted = employees,
                    customers_detached = links,
                    "cascading pet store delete"
                );
            }
            DeletePolicy::Restrict => {
                let employees = tx.find_employees_by_store(id).await?.len();
                let customers = tx.find_customers_by_store(id).await?.len();
                if employees > 0 || customers > 0 {
                    return Err(AppError::Conflict(format!(
                        "Pet store with ID={} still has {} employee(s) and {} customer(s).",
                        id, employees, customers
                    )));
                }
            }
        }

        tx.delete_store(id).await?;
        tx.commit().await?;
        Ok(DeletionMessage::for_store(id))
    }
}
