use chrono::Utc;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{CreateEmployeeRequest, Employee, EmployeeResponse};
use crate::services::AuthService;

/// Employee service
pub struct EmployeeService;

impl EmployeeService {
    /// Register a new employee
    pub async fn create(db: &Database, req: CreateEmployeeRequest) -> Result<EmployeeResponse> {
        let username = req.username.trim();
        if username.is_empty() {
            return Err(AppError::BadRequest("Username is required".to_string()));
        }
        if req.password.is_empty() {
            return Err(AppError::BadRequest("Password is required".to_string()));
        }

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM employees WHERE username = ?")
            .bind(username)
            .fetch_optional(db.pool())
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = AuthService::hash_password(&req.password)?;
        let now = Utc::now().to_rfc3339();

        // The UNIQUE index still guards against a concurrent registration
        let result = sqlx::query(
            r#"
            INSERT INTO employees (full_name, phone, email, username, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.full_name)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(username)
        .bind(&password_hash)
        .bind(&now)
        .execute(db.pool())
        .await?;

        let employee = Self::get(db, result.last_insert_rowid()).await?;
        tracing::info!("Created employee {} ({})", employee.id, employee.username);
        Ok(EmployeeResponse::from(employee))
    }

    pub async fn get(db: &Database, id: i64) -> Result<Employee> {
        sqlx::query_as("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
    }

    /// List all employees
    pub async fn list(db: &Database) -> Result<Vec<EmployeeResponse>> {
        let employees: Vec<Employee> = sqlx::query_as("SELECT * FROM employees ORDER BY id")
            .fetch_all(db.pool())
            .await?;

        Ok(employees.into_iter().map(EmployeeResponse::from).collect())
    }
}
