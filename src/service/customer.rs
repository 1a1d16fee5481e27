use super::store::find_store_by_id;
use super::PetStoreService;
use crate::error::AppError;
use crate::model::{Customer, CustomerId, CustomerInput, PetStoreCustomer, StoreId, Target};
use crate::repo::UnitOfWork;

/// Load a customer and check that it is already associated with `store_id`.
async fn find_customer_in_store(
    tx: &mut dyn UnitOfWork,
    store_id: StoreId,
    customer_id: CustomerId,
) -> Result<Customer, AppError> {
    let customer = tx
        .find_customer(customer_id)
        .await?
        .ok_or_else(|| AppError::customer_not_found(customer_id))?;
    if !customer.is_associated_with(store_id) {
        tracing::warn!(
            customer_id = %customer_id,
            pet_store_id = %store_id,
            "customer referenced through an unassociated store"
        );
        return Err(AppError::store_not_in_customer(store_id, customer_id));
    }
    Ok(customer)
}

impl PetStoreService {
    /// Create a customer of the store, or update one already associated with it.
    /// The association is recorded on both sides in the same unit of work.
    pub async fn save_customer(
        &self,
        store_id: StoreId,
        input: CustomerInput,
    ) -> Result<PetStoreCustomer, AppError> {
        let mut tx = self.begin_write().await?;
        find_store_by_id(tx.as_mut(), store_id).await?;

        let mut customer = match input.target() {
            Target::New => Customer::default(),
            Target::Existing(id) => find_customer_in_store(tx.as_mut(), store_id, id).await?,
        };
        input.copy_into(&mut customer);
        customer.store_ids.insert(store_id);

        let saved = tx.save_customer(&customer).await?;
        tx.commit().await?;
        tracing::debug!(customer_id = ?saved.id, pet_store_id = %store_id, "customer saved");
        Ok(PetStoreCustomer::from(&saved))
    }

    pub async fn find_customer_by_id(
        &self,
        store_id: StoreId,
        customer_id: CustomerId,
    ) -> Result<PetStoreCustomer, AppError> {
        let mut tx = self.begin_read().await?;
        let customer = find_customer_in_store(tx.as_mut(), store_id, customer_id).await?;
        tx.commit().await?;
        Ok(PetStoreCustomer::from(&customer))
    }
}
