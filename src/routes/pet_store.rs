//! Pet store routes under `/pet_store`.

use crate::handlers::pet_store::{
    add_customer, create_employee, create_pet_store, delete_pet_store, get_customer, get_employee,
    get_pet_store, list_pet_stores, update_customer, update_employee, update_pet_store,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn pet_store_routes(state: AppState) -> Router {
    Router::new()
        .route("/pet_store", get(list_pet_stores).post(create_pet_store))
        .route(
            "/pet_store/:pet_store_id",
            get(get_pet_store).put(update_pet_store).delete(delete_pet_store),
        )
        .route("/pet_store/:pet_store_id/employee", post(create_employee))
        .route(
            "/pet_store/:pet_store_id/employee/:employee_id",
            get(get_employee).put(update_employee),
        )
        .route("/pet_store/:pet_store_id/customer", post(add_customer))
        .route(
            "/pet_store/:pet_store_id/customer/:customer_id",
            get(get_customer).put(update_customer),
        )
        .with_state(state)
}
