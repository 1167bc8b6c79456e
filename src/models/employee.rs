use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Employee model. Doubles as the credential store.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Employee response (without credentials)
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub username: String,
    pub created_at: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            full_name: employee.full_name,
            phone: employee.phone,
            email: employee.email,
            username: employee.username,
            created_at: employee.created_at,
        }
    }
}

/// Create employee request
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Token request, accepted as form body or query string
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Token response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub username: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Current authenticated employee (extracted from JWT)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    /// Employee id; tokens without it are rejected by the request gate
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub nbf: usize,
    pub exp: usize,
}
