//! Pet store handlers: stores, their employees and their customers.

use crate::error::AppError;
use crate::model::{CustomerId, CustomerInput, EmployeeId, EmployeeInput, StoreId, StoreInput};
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;

fn parse_id<I: FromStr>(id_str: &str, kind: &str) -> Result<I, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid {} id '{}'", kind, id_str)))
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    if !body.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn create_pet_store(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: StoreInput = parse_body(body)?;
    tracing::info!(pet_store_id = ?input.pet_store_id, "creating pet store");
    let data = state.service.save_pet_store(input).await?;
    Ok(success_one(data))
}

pub async fn update_pet_store(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id: StoreId = parse_id(&id_str, "pet store")?;
    let mut input: StoreInput = parse_body(body)?;
    input.pet_store_id = Some(id);
    tracing::info!(pet_store_id = %id, "updating pet store");
    let data = state.service.save_pet_store(input).await?;
    Ok(success_one_ok(data))
}

pub async fn list_pet_stores(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stores = state.service.retrieve_all_pet_stores().await?;
    Ok(success_many(stores))
}

pub async fn get_pet_store(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id: StoreId = parse_id(&id_str, "pet store")?;
    tracing::info!(pet_store_id = %id, "retrieving pet store");
    let data = state.service.retrieve_pet_store_by_id(id).await?;
    Ok(success_one_ok(data))
}

pub async fn delete_pet_store(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id: StoreId = parse_id(&id_str, "pet store")?;
    tracing::info!(pet_store_id = %id, policy = ?state.service.delete_policy(), "deleting pet store");
    let message = state.service.delete_pet_store_by_id(id).await?;
    Ok(success_one_ok(message))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Path(store_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let store_id: StoreId = parse_id(&store_str, "pet store")?;
    let input: EmployeeInput = parse_body(body)?;
    tracing::info!(pet_store_id = %store_id, employee_id = ?input.employee_id, "creating pet store employee");
    let employee = state.service.save_employee(store_id, input).await?;
    Ok(success_one(employee))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path((store_str, employee_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let store_id: StoreId = parse_id(&store_str, "pet store")?;
    let employee_id: EmployeeId = parse_id(&employee_str, "employee")?;
    let mut input: EmployeeInput = parse_body(body)?;
    input.employee_id = Some(employee_id);
    tracing::info!(pet_store_id = %store_id, employee_id = %employee_id, "updating pet store employee");
    let employee = state.service.save_employee(store_id, input).await?;
    Ok(success_one_ok(employee))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path((store_str, employee_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let store_id: StoreId = parse_id(&store_str, "pet store")?;
    let employee_id: EmployeeId = parse_id(&employee_str, "employee")?;
    let employee = state.service.find_employee_by_id(store_id, employee_id).await?;
    Ok(success_one_ok(employee))
}

pub async fn add_customer(
    State(state): State<AppState>,
    Path(store_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let store_id: StoreId = parse_id(&store_str, "pet store")?;
    let input: CustomerInput = parse_body(body)?;
    tracing::info!(pet_store_id = %store_id, customer_id = ?input.customer_id, "adding pet store customer");
    let customer = state.service.save_customer(store_id, input).await?;
    Ok(success_one(customer))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path((store_str, customer_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let store_id: StoreId = parse_id(&store_str, "pet store")?;
    let customer_id: CustomerId = parse_id(&customer_str, "customer")?;
    let mut input: CustomerInput = parse_body(body)?;
    input.customer_id = Some(customer_id);
    tracing::info!(pet_store_id = %store_id, customer_id = %customer_id, "updating pet store customer");
    let customer = state.service.save_customer(store_id, input).await?;
    Ok(success_one_ok(customer))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path((store_str, customer_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let store_id: StoreId = parse_id(&store_str, "pet store")?;
    let customer_id: CustomerId = parse_id(&customer_str, "customer")?;
    let customer = state.service.find_customer_by_id(store_id, customer_id).await?;
    Ok(success_one_ok(customer))
}
