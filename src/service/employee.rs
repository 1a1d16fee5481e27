use super::store::find_store_by_id;
use super::PetStoreService;
use crate::error::AppError;
use crate::model::{Employee, EmployeeId, EmployeeInput, PetStoreEmployee, StoreId, Target};
use crate::repo::UnitOfWork;

/// Load an employee and check that it works for `store_id`.
async fn find_employee_in_store(
    tx: &mut dyn UnitOfWork,
    store_id: StoreId,
    employee_id: EmployeeId,
) -> Result<Employee, AppError> {
    let employee = tx
        .find_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::employee_not_found(employee_id))?;
    if !employee.belongs_to(store_id) {
        tracing::warn!(
            employee_id = %employee_id,
            pet_store_id = %store_id,
            owner = %employee.store_id,
            "employee referenced through another store"
        );
        return Err(AppError::employee_not_in_store(employee_id, store_id));
    }
    Ok(employee)
}

impl PetStoreService {
    /// Create an employee for the store, or update one the store already owns.
    pub async fn save_employee(
        &self,
        store_id: StoreId,
        input: EmployeeInput,
    ) -> Result<PetStoreEmployee, AppError> {
        let mut tx = self.begin_write().await?;
        find_store_by_id(tx.as_mut(), store_id).await?;

        let mut employee = match input.target() {
            Target::New => Employee::new(store_id),
            Target::Existing(id) => find_employee_in_store(tx.as_mut(), store_id, id).await?,
        };
        input.copy_into(&mut employee);
        employee.store_id = store_id;

        let saved = tx.save_employee(&employee).await?;
        tx.commit().await?;
        tracing::debug!(employee_id = ?saved.id, pet_store_id = %store_id, "employee saved");
        Ok(PetStoreEmployee::from(&saved))
    }

    pub async fn find_employee_by_id(
        &self,
        store_id: StoreId,
        employee_id: EmployeeId,
    ) -> Result<PetStoreEmployee, AppError> {
        let mut tx = self.begin_read().await?;
        let employee = find_employee_in_store(tx.as_mut(), store_id, employee_id).await?;
        tx.commit().await?;
        Ok(PetStoreEmployee::from(&employee))
    }
}
