use axum::{extract::State, http::StatusCode, Json};

use crate::error::{ApiResponse, Result};
use crate::models::{CreateEmployeeRequest, EmployeeResponse};
use crate::services::EmployeeService;
use crate::AppState;

/// List employees
/// GET /api/employee
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EmployeeResponse>>>> {
    let employees = EmployeeService::list(&state.db).await?;
    Ok(Json(ApiResponse::success(employees)))
}

/// Register an employee
/// POST /api/employee
pub async fn create_employee(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeResponse>>)> {
    let employee = EmployeeService::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(employee))))
}
