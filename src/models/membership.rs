use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Employee ↔ department link, keyed by both ids
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeDepartment {
    pub employee_id: i64,
    pub department_id: i64,
}

/// Employee ↔ device link, keyed by both ids
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeDevice {
    pub employee_id: i64,
    pub device_id: i64,
}
