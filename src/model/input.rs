//! Request payloads. Every scalar is optional: a save overwrites all fields, so
//! an absent field is stored as null.

use crate::model::entity::{Customer, Employee, PetStore};
use crate::model::id::{CustomerId, EmployeeId, StoreId, Target};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreInput {
    pub pet_store_id: Option<StoreId>,
    pub pet_store_name: Option<String>,
    pub pet_store_address: Option<String>,
    pub pet_store_city: Option<String>,
    pub pet_store_state: Option<String>,
    pub pet_store_zip: Option<String>,
    pub pet_store_phone: Option<String>,
}

impl StoreInput {
    pub fn target(&self) -> Target<StoreId> {
        self.pet_store_id.into()
    }

    pub fn copy_into(self, store: &mut PetStore) {
        store.name = self.pet_store_name;
        store.address = self.pet_store_address;
        store.city = self.pet_store_city;
        store.state = self.pet_store_state;
        store.zip = self.pet_store_zip;
        store.phone = self.pet_store_phone;
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeInput {
    pub employee_id: Option<EmployeeId>,
    pub employee_first_name: Option<String>,
    pub employee_last_name: Option<String>,
    pub employee_phone: Option<String>,
    pub employee_job_title: Option<String>,
}

impl EmployeeInput {
    pub fn target(&self) -> Target<EmployeeId> {
        self.employee_id.into()
    }

    pub fn copy_into(self, employee: &mut Employee) {
        employee.first_name = self.employee_first_name;
        employee.last_name = self.employee_last_name;
        employee.phone = self.employee_phone;
        employee.job_title = self.employee_job_title;
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerInput {
    pub customer_id: Option<CustomerId>,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    pub customer_email: Option<String>,
}

impl CustomerInput {
    pub fn target(&self) -> Target<CustomerId> {
        self.customer_id.into()
    }

    pub fn copy_into(self, customer: &mut Customer) {
        customer.first_name = self.customer_first_name;
        customer.last_name = self.customer_last_name;
        customer.email = self.customer_email;
    }
}
