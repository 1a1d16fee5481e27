//! Response shapes. These are separate from the persisted entities: nested
//! collections are flat views, so nothing points back at its parent.

use crate::model::entity::{Customer, Employee, PetStore};
use crate::model::id::{CustomerId, EmployeeId, StoreId};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetStoreData {
    pub pet_store_id: Option<StoreId>,
    pub pet_store_name: Option<String>,
    pub pet_store_address: Option<String>,
    pub pet_store_city: Option<String>,
    pub pet_store_state: Option<String>,
    pub pet_store_zip: Option<String>,
    pub pet_store_phone: Option<String>,
    pub employees: Vec<PetStoreEmployee>,
    pub customers: Vec<PetStoreCustomer>,
}

impl PetStoreData {
    /// Store with its employee and customer collections.
    pub fn detailed(store: PetStore, employees: &[Employee], customers: &[Customer]) -> Self {
        let mut data = Self::summary(store);
        data.employees = employees.iter().map(PetStoreEmployee::from).collect();
        data.customers = customers.iter().map(PetStoreCustomer::from).collect();
        data
    }

    /// Store with both collections empty, for listings.
    pub fn summary(store: PetStore) -> Self {
        PetStoreData {
            pet_store_id: store.id,
            pet_store_name: store.name,
            pet_store_address: store.address,
            pet_store_city: store.city,
            pet_store_state: store.state,
            pet_store_zip: store.zip,
            pet_store_phone: store.phone,
            employees: Vec::new(),
            customers: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetStoreEmployee {
    pub employee_id: Option<EmployeeId>,
    pub pet_store_id: StoreId,
    pub employee_first_name: Option<String>,
    pub employee_last_name: Option<String>,
    pub employee_phone: Option<String>,
    pub employee_job_title: Option<String>,
}

impl From<&Employee> for PetStoreEmployee {
    fn from(e: &Employee) -> Self {
        PetStoreEmployee {
            employee_id: e.id,
            pet_store_id: e.store_id,
            employee_first_name: e.first_name.clone(),
            employee_last_name: e.last_name.clone(),
            employee_phone: e.phone.clone(),
            employee_job_title: e.job_title.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetStoreCustomer {
    pub customer_id: Option<CustomerId>,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    pub customer_email: Option<String>,
    pub pet_store_ids: Vec<StoreId>,
}

impl From<&Customer> for PetStoreCustomer {
    fn from(c: &Customer) -> Self {
        PetStoreCustomer {
            customer_id: c.id,
            customer_first_name: c.first_name.clone(),
            customer_last_name: c.last_name.clone(),
            customer_email: c.email.clone(),
            pet_store_ids: c.store_ids.iter().copied().collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DeletionMessage {
    pub message: String,
}

impl DeletionMessage {
    pub fn for_store(id: StoreId) -> Self {
        DeletionMessage {
            message: format!("Deletion of pet store with ID={} was successful.", id),
        }
    }
}
