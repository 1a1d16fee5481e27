//! PostgreSQL repositories over a single `sqlx` transaction.

use super::{CustomerRepository, EmployeeRepository, Repository, StoreRepository, TxMode, UnitOfWork};
use crate::config::StorageKind;
use crate::error::AppError;
use crate::model::{Customer, CustomerId, Employee, EmployeeId, PetStore, StoreId};
use crate::schema::Tables;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

const STORE_COLUMNS: &str = "pet_store_id, pet_store_name, pet_store_address, pet_store_city, \
     pet_store_state, pet_store_zip, pet_store_phone";

const EMPLOYEE_COLUMNS: &str = "employee_id, pet_store_id, employee_first_name, employee_last_name, \
     employee_phone, employee_job_title";

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
    tables: Tables,
}

impl PgRepository {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgRepository {
            pool,
            tables: Tables::new(schema),
        }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn UnitOfWork>, AppError> {
        let mut tx = self.pool.begin().await?;
        if mode == TxMode::ReadOnly {
            sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
                .execute(&mut *tx)
                .await?;
        }
        Ok(Box::new(PgUnitOfWork {
            tx,
            tables: self.tables.clone(),
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    fn storage(&self) -> StorageKind {
        StorageKind::Postgres
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
    tables: Tables,
}

#[derive(sqlx::FromRow)]
struct StoreRow {
    pet_store_id: i64,
    pet_store_name: Option<String>,
    pet_store_address: Option<String>,
    pet_store_city: Option<String>,
    pet_store_state: Option<String>,
    pet_store_zip: Option<String>,
    pet_store_phone: Option<String>,
}

impl From<StoreRow> for PetStore {
    fn from(row: StoreRow) -> Self {
        PetStore {
            id: Some(StoreId::new(row.pet_store_id)),
            name: row.pet_store_name,
            address: row.pet_store_address,
            city: row.pet_store_city,
            state: row.pet_store_state,
            zip: row.pet_store_zip,
            phone: row.pet_store_phone,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    employee_id: i64,
    pet_store_id: i64,
    employee_first_name: Option<String>,
    employee_last_name: Option<String>,
    employee_phone: Option<String>,
    employee_job_title: Option<String>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: Some(EmployeeId::new(row.employee_id)),
            store_id: StoreId::new(row.pet_store_id),
            first_name: row.employee_first_name,
            last_name: row.employee_last_name,
            phone: row.employee_phone,
            job_title: row.employee_job_title,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    customer_id: i64,
    customer_first_name: Option<String>,
    customer_last_name: Option<String>,
    customer_email: Option<String>,
    pet_store_ids: Vec<i64>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: Some(CustomerId::new(row.customer_id)),
            first_name: row.customer_first_name,
            last_name: row.customer_last_name,
            email: row.customer_email,
            store_ids: row.pet_store_ids.into_iter().map(StoreId::new).collect(),
        }
    }
}

impl PgUnitOfWork {
    /// Customer columns plus the aggregated store ids of each customer (alias `c`).
    fn customer_select(&self) -> String {
        format!(
            "SELECT c.customer_id, c.customer_first_name, c.customer_last_name, c.customer_email, \
             ARRAY(SELECT l.pet_store_id FROM {} l WHERE l.customer_id = c.customer_id \
             ORDER BY l.pet_store_id) AS pet_store_ids \
             FROM {} c",
            self.tables.store_customer, self.tables.customer
        )
    }
}

#[async_trait]
impl StoreRepository for PgUnitOfWork {
    async fn find_store(&mut self, id: StoreId) -> Result<Option<PetStore>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE pet_store_id = $1",
            STORE_COLUMNS, self.tables.store
        );
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(PetStore::from))
    }

    async fn find_all_stores(&mut self) -> Result<Vec<PetStore>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY pet_store_id",
            STORE_COLUMNS, self.tables.store
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, StoreRow>(&sql)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows.into_iter().map(PetStore::from).collect())
    }

    async fn save_store(&mut self, store: &PetStore) -> Result<PetStore, AppError> {
        let sql = match store.id {
            None => format!(
                "INSERT INTO {} (pet_store_name, pet_store_address, pet_store_city, pet_store_state, \
                 pet_store_zip, pet_store_phone) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
                self.tables.store, STORE_COLUMNS
            ),
            Some(_) => format!(
                "UPDATE {} SET pet_store_name = $1, pet_store_address = $2, pet_store_city = $3, \
                 pet_store_state = $4, pet_store_zip = $5, pet_store_phone = $6 \
                 WHERE pet_store_id = $7 RETURNING {}",
                self.tables.store, STORE_COLUMNS
            ),
        };
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(&store.name)
            .bind(&store.address)
            .bind(&store.city)
            .bind(&store.state)
            .bind(&store.zip)
            .bind(&store.phone);
        if let Some(id) = store.id {
            query = query.bind(id.get());
        }
        let row = query.fetch_optional(&mut *self.tx).await?;
        match (row, store.id) {
            (Some(row), _) => Ok(row.into()),
            (None, Some(id)) => Err(AppError::store_not_found(id)),
            (None, None) => Err(AppError::Db(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete_store(&mut self, id: StoreId) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE pet_store_id = $1", self.tables.store);
        tracing::debug!(sql = %sql, id = %id, "query");
        let result = sqlx::query(&sql)
            .bind(id.get())
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::store_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for PgUnitOfWork {
    async fn find_employee(&mut self, id: EmployeeId) -> Result<Option<Employee>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE employee_id = $1",
            EMPLOYEE_COLUMNS, self.tables.employee
        );
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(Employee::from))
    }

    async fn find_employees_by_store(&mut self, store_id: StoreId) -> Result<Vec<Employee>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE pet_store_id = $1 ORDER BY employee_id",
            EMPLOYEE_COLUMNS, self.tables.employee
        );
        tracing::debug!(sql = %sql, store_id = %store_id, "query");
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(store_id.get())
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn save_employee(&mut self, employee: &Employee) -> Result<Employee, AppError> {
        let sql = match employee.id {
            None => format!(
                "INSERT INTO {} (pet_store_id, employee_first_name, employee_last_name, employee_phone, \
                 employee_job_title) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
                self.tables.employee, EMPLOYEE_COLUMNS
            ),
            Some(_) => format!(
                "UPDATE {} SET pet_store_id = $1, employee_first_name = $2, employee_last_name = $3, \
                 employee_phone = $4, employee_job_title = $5 WHERE employee_id = $6 RETURNING {}",
                self.tables.employee, EMPLOYEE_COLUMNS
            ),
        };
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(employee.store_id.get())
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(&employee.phone)
            .bind(&employee.job_title);
        if let Some(id) = employee.id {
            query = query.bind(id.get());
        }
        let row = query.fetch_optional(&mut *self.tx).await?;
        match (row, employee.id) {
            (Some(row), _) => Ok(row.into()),
            (None, Some(id)) => Err(AppError::employee_not_found(id)),
            (None, None) => Err(AppError::Db(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete_employees_by_store(&mut self, store_id: StoreId) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE pet_store_id = $1", self.tables.employee);
        tracing::debug!(sql = %sql, store_id = %store_id, "query");
        let result = sqlx::query(&sql)
            .bind(store_id.get())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CustomerRepository for PgUnitOfWork {
    async fn find_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, AppError> {
        let sql = format!("{} WHERE c.customer_id = $1", self.customer_select());
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn find_customers_by_store(&mut self, store_id: StoreId) -> Result<Vec<Customer>, AppError> {
        let sql = format!(
            "{} JOIN {} sc ON sc.customer_id = c.customer_id WHERE sc.pet_store_id = $1 \
             ORDER BY c.customer_id",
            self.customer_select(),
            self.tables.store_customer
        );
        tracing::debug!(sql = %sql, store_id = %store_id, "query");
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(store_id.get())
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn save_customer(&mut self, customer: &Customer) -> Result<Customer, AppError> {
        let sql = match customer.id {
            None => format!(
                "INSERT INTO {} (customer_first_name, customer_last_name, customer_email) \
                 VALUES ($1, $2, $3) RETURNING customer_id",
                self.tables.customer
            ),
            Some(_) => format!(
                "UPDATE {} SET customer_first_name = $1, customer_last_name = $2, customer_email = $3 \
                 WHERE customer_id = $4 RETURNING customer_id",
                self.tables.customer
            ),
        };
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query_scalar::<_, i64>(&sql)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email);
        if let Some(id) = customer.id {
            query = query.bind(id.get());
        }
        let id = match (query.fetch_optional(&mut *self.tx).await?, customer.id) {
            (Some(id), _) => CustomerId::new(id),
            (None, Some(id)) => return Err(AppError::customer_not_found(id)),
            (None, None) => return Err(AppError::Db(sqlx::Error::RowNotFound)),
        };

        let link_sql = format!(
            "INSERT INTO {} (pet_store_id, customer_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            self.tables.store_customer
        );
        for store_id in &customer.store_ids {
            tracing::debug!(sql = %link_sql, store_id = %store_id, customer_id = %id, "query");
            sqlx::query(&link_sql)
                .bind(store_id.get())
                .bind(id.get())
                .execute(&mut *self.tx)
                .await?;
        }

        self.find_customer(id)
            .await?
            .ok_or_else(|| AppError::customer_not_found(id))
    }

    async fn detach_customers_from_store(&mut self, store_id: StoreId) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE pet_store_id = $1", self.tables.store_customer);
        tracing::debug!(sql = %sql, store_id = %store_id, "query");
        let result = sqlx::query(&sql)
            .bind(store_id.get())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let uow = *self;
        uow.tx.commit().await?;
        Ok(())
    }
}
