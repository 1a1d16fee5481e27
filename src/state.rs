//! Shared application state for all routes.

use crate::service::PetStoreService;

#[derive(Clone)]
pub struct AppState {
    pub service: PetStoreService,
}

impl AppState {
    pub fn new(service: PetStoreService) -> Self {
        AppState { service }
    }
}
