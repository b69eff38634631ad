//! Repository for the `employees` table. The service layer resolves
//! usernames to employee ids here; an unknown username is an authentication
//! failure upstream.

use procura_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{CreateEmployee, Employee};

/// Column list for `employees` queries.
const COLUMNS: &str = "id, username, first_name, last_name, created_at, updated_at";

/// Provides persistence operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Create a new employee.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (username, first_name, last_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }

    /// Find an employee by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an employee by username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE username = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }
}
