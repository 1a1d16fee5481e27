use pet_store_api::model::{
    CustomerId, CustomerInput, EmployeeId, EmployeeInput, StoreId, StoreInput,
};
use pet_store_api::repo::{Repository, TxMode};
use pet_store_api::{AppError, DeletePolicy, MemoryRepository, PetStoreService};
use std::sync::Arc;

fn service_with(policy: DeletePolicy) -> (PetStoreService, MemoryRepository) {
    let repo = MemoryRepository::new();
    let service = PetStoreService::new(Arc::new(repo.clone()), policy);
    (service, repo)
}

fn service() -> PetStoreService {
    service_with(DeletePolicy::Cascade).0
}

fn store_input(name: &str) -> StoreInput {
    StoreInput {
        pet_store_name: Some(name.to_string()),
        pet_store_city: Some("Boise".to_string()),
        pet_store_phone: Some("208-555-0100".to_string()),
        ..StoreInput::default()
    }
}

fn employee_input(first: &str) -> EmployeeInput {
    EmployeeInput {
        employee_first_name: Some(first.to_string()),
        employee_job_title: Some("Groomer".to_string()),
        ..EmployeeInput::default()
    }
}

fn customer_input(first: &str) -> CustomerInput {
    CustomerInput {
        customer_first_name: Some(first.to_string()),
        customer_email: Some(format!("{}@example.com", first.to_lowercase())),
        ..CustomerInput::default()
    }
}

async fn create_store(service: &PetStoreService, name: &str) -> StoreId {
    service
        .save_pet_store(store_input(name))
        .await
        .unwrap()
        .pet_store_id
        .unwrap()
}

#[tokio::test]
async fn save_without_id_creates_a_new_store() {
    let service = service();
    let first = service.save_pet_store(store_input("Paws")).await.unwrap();
    let second = service.save_pet_store(store_input("Claws")).await.unwrap();

    assert_eq!(first.pet_store_id, Some(StoreId::new(1)));
    assert_eq!(second.pet_store_id, Some(StoreId::new(2)));
    assert!(first.employees.is_empty());
    assert_eq!(service.retrieve_all_pet_stores().await.unwrap().len(), 2);
}

#[tokio::test]
async fn save_with_id_replaces_every_field() {
    let service = service();
    let id = create_store(&service, "Paws").await;

    let update = StoreInput {
        pet_store_id: Some(id),
        pet_store_name: Some("Paws & Claws".to_string()),
        pet_store_zip: Some("83702".to_string()),
        ..StoreInput::default()
    };
    let saved = service.save_pet_store(update).await.unwrap();

    assert_eq!(saved.pet_store_id, Some(id));
    assert_eq!(saved.pet_store_name.as_deref(), Some("Paws & Claws"));
    assert_eq!(saved.pet_store_zip.as_deref(), Some("83702"));
    assert_eq!(saved.pet_store_city, None);
    assert_eq!(saved.pet_store_phone, None);

    let stored = service.retrieve_pet_store_by_id(id).await.unwrap();
    assert_eq!(stored, saved);
}

#[tokio::test]
async fn save_with_unknown_id_is_not_found() {
    let service = service();
    let update = StoreInput {
        pet_store_id: Some(StoreId::new(42)),
        ..store_input("Nowhere")
    };
    let err = service.save_pet_store(update).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(service.retrieve_all_pet_stores().await.unwrap().is_empty());
}

#[tokio::test]
async fn identical_updates_are_idempotent() {
    let service = service();
    let id = create_store(&service, "Paws").await;
    let update = StoreInput {
        pet_store_id: Some(id),
        ..store_input("Paws Downtown")
    };

    let once = service.save_pet_store(update.clone()).await.unwrap();
    let twice = service.save_pet_store(update).await.unwrap();
    assert_eq!(once, twice);
    assert_eq!(service.retrieve_all_pet_stores().await.unwrap().len(), 1);
}

#[tokio::test]
async fn employee_for_missing_store_is_not_found_and_nothing_is_created() {
    let service = service();
    let id = create_store(&service, "Paws").await;

    let err = service
        .save_employee(StoreId::new(999), employee_input("Ann"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Pet store with ID=999 does not exist.");

    let store = service.retrieve_pet_store_by_id(id).await.unwrap();
    assert!(store.employees.is_empty());
    let lookup = service.find_employee_by_id(id, EmployeeId::new(1)).await;
    assert!(matches!(lookup, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn employee_of_another_store_is_rejected_without_mutation() {
    let service = service();
    let store_a = create_store(&service, "A").await;
    let store_b = create_store(&service, "B").await;
    let employee = service.save_employee(store_b, employee_input("Ann")).await.unwrap();
    let employee_id = employee.employee_id.unwrap();

    let hijack = EmployeeInput {
        employee_id: Some(employee_id),
        ..employee_input("Mallory")
    };
    let err = service.save_employee(store_a, hijack).await.unwrap_err();
    assert!(matches!(err, AppError::OwnershipMismatch(_)));

    let unchanged = service.find_employee_by_id(store_b, employee_id).await.unwrap();
    assert_eq!(unchanged.employee_first_name.as_deref(), Some("Ann"));
    assert_eq!(unchanged.pet_store_id, store_b);
    assert!(matches!(
        service.find_employee_by_id(store_a, employee_id).await,
        Err(AppError::OwnershipMismatch(_))
    ));
}

#[tokio::test]
async fn updating_an_employee_keeps_a_single_record() {
    let service = service();
    let store = create_store(&service, "Paws").await;
    let created = service.save_employee(store, employee_input("Ann")).await.unwrap();

    let update = EmployeeInput {
        employee_id: created.employee_id,
        employee_first_name: Some("Anne".to_string()),
        employee_phone: Some("555-0101".to_string()),
        ..EmployeeInput::default()
    };
    let updated = service.save_employee(store, update).await.unwrap();
    assert_eq!(updated.employee_id, created.employee_id);
    assert_eq!(updated.employee_job_title, None);

    let detail = service.retrieve_pet_store_by_id(store).await.unwrap();
    assert_eq!(detail.employees.len(), 1);
    assert_eq!(detail.employees[0].employee_first_name.as_deref(), Some("Anne"));
}

#[tokio::test]
async fn new_customer_is_linked_on_both_sides() {
    let service = service();
    let store = create_store(&service, "Paws").await;

    let customer = service.save_customer(store, customer_input("Alice")).await.unwrap();
    assert_eq!(customer.pet_store_ids, vec![store]);

    let detail = service.retrieve_pet_store_by_id(store).await.unwrap();
    assert_eq!(detail.customers.len(), 1);
    assert_eq!(detail.customers[0].customer_id, customer.customer_id);
    assert_eq!(detail.customers[0].customer_first_name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn customer_of_another_store_is_rejected() {
    let service = service();
    let store_1 = create_store(&service, "One").await;
    let store_2 = create_store(&service, "Two").await;
    let customer = service.save_customer(store_2, customer_input("Carl")).await.unwrap();
    let customer_id = customer.customer_id.unwrap();

    let update = CustomerInput {
        customer_id: Some(customer_id),
        ..customer_input("Carl")
    };
    let err = service.save_customer(store_1, update).await.unwrap_err();
    assert!(matches!(err, AppError::OwnershipMismatch(_)));
    assert!(service
        .retrieve_pet_store_by_id(store_1)
        .await
        .unwrap()
        .customers
        .is_empty());
    assert!(matches!(
        service.find_customer_by_id(store_1, customer_id).await,
        Err(AppError::OwnershipMismatch(_))
    ));
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let service = service();
    let store = create_store(&service, "Paws").await;
    let update = CustomerInput {
        customer_id: Some(CustomerId::new(7)),
        ..customer_input("Ghost")
    };
    let err = service.save_customer(store, update).await.unwrap_err();
    assert_eq!(err.to_string(), "Customer with ID=7 does not exist.");
}

#[tokio::test]
async fn resaving_a_customer_keeps_one_association() {
    let service = service();
    let store = create_store(&service, "Paws").await;
    let created = service.save_customer(store, customer_input("Alice")).await.unwrap();

    let update = CustomerInput {
        customer_id: created.customer_id,
        customer_last_name: Some("Liddell".to_string()),
        ..customer_input("Alice")
    };
    let updated = service.save_customer(store, update).await.unwrap();
    assert_eq!(updated.pet_store_ids, vec![store]);
    assert_eq!(updated.customer_last_name.as_deref(), Some("Liddell"));
    assert_eq!(service.retrieve_pet_store_by_id(store).await.unwrap().customers.len(), 1);
}

#[tokio::test]
async fn list_strips_collections_but_get_includes_them() {
    let service = service();
    let store = create_store(&service, "Paws").await;
    for name in ["Ann", "Bob", "Cy"] {
        service.save_employee(store, employee_input(name)).await.unwrap();
    }
    for name in ["Alice", "Ben"] {
        service.save_customer(store, customer_input(name)).await.unwrap();
    }

    let listed = service.retrieve_all_pet_stores().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].employees.is_empty());
    assert!(listed[0].customers.is_empty());

    let detail = service.retrieve_pet_store_by_id(store).await.unwrap();
    assert_eq!(detail.employees.len(), 3);
    assert_eq!(detail.customers.len(), 2);
}

#[tokio::test]
async fn deleting_a_missing_store_is_not_found() {
    let service = service();
    let store = create_store(&service, "Paws").await;

    let err = service.delete_pet_store_by_id(StoreId::new(404)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(service.retrieve_all_pet_stores().await.unwrap().len(), 1);
    assert!(service.retrieve_pet_store_by_id(store).await.is_ok());
}

#[tokio::test]
async fn cascade_delete_removes_employees_and_detaches_customers() {
    let (service, repo) = service_with(DeletePolicy::Cascade);
    let doomed = create_store(&service, "Doomed").await;
    let survivor = create_store(&service, "Survivor").await;
    let employee = service.save_employee(doomed, employee_input("Ann")).await.unwrap();
    let customer = service.save_customer(doomed, customer_input("Alice")).await.unwrap();
    let customer_id = customer.customer_id.unwrap();

    // Associate the customer with a second store directly through the gateway.
    {
        let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
        let mut stored = tx.find_customer(customer_id).await.unwrap().unwrap();
        stored.store_ids.insert(survivor);
        tx.save_customer(&stored).await.unwrap();
        tx.commit().await.unwrap();
    }

    let message = service.delete_pet_store_by_id(doomed).await.unwrap();
    assert_eq!(message.message, "Deletion of pet store with ID=1 was successful.");

    assert!(matches!(
        service.retrieve_pet_store_by_id(doomed).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.find_employee_by_id(doomed, employee.employee_id.unwrap()).await,
        Err(AppError::NotFound(_))
    ));
    let kept = service.find_customer_by_id(survivor, customer_id).await.unwrap();
    assert_eq!(kept.pet_store_ids, vec![survivor]);
}

#[tokio::test]
async fn restrict_delete_refuses_stores_with_dependents() {
    let (service, _repo) = service_with(DeletePolicy::Restrict);
    let busy = create_store(&service, "Busy").await;
    let empty = create_store(&service, "Empty").await;
    service.save_employee(busy, employee_input("Ann")).await.unwrap();

    let err = service.delete_pet_store_by_id(busy).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let detail = service.retrieve_pet_store_by_id(busy).await.unwrap();
    assert_eq!(detail.employees.len(), 1);

    service.delete_pet_store_by_id(empty).await.unwrap();
    assert_eq!(service.retrieve_all_pet_stores().await.unwrap().len(), 1);
}
