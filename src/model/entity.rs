//! Persisted entities. Relationships are held as ids, never as nested entities,
//! so the graph has no cycles.

use crate::model::id::{CustomerId, EmployeeId, StoreId};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PetStore {
    /// `None` until the store has been saved.
    pub id: Option<StoreId>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Employee {
    pub id: Option<EmployeeId>,
    /// Owning store. Overwritten on every save.
    pub store_id: StoreId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
}

impl Employee {
    pub fn new(store_id: StoreId) -> Self {
        Employee {
            id: None,
            store_id,
            first_name: None,
            last_name: None,
            phone: None,
            job_title: None,
        }
    }

    pub fn belongs_to(&self, store_id: StoreId) -> bool {
        self.store_id == store_id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Stores this customer is associated with.
    pub store_ids: BTreeSet<StoreId>,
}

impl Customer {
    pub fn is_associated_with(&self, store_id: StoreId) -> bool {
        self.store_ids.contains(&store_id)
    }
}
