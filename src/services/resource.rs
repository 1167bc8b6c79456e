//! List/create operations shared by every reference and join entity.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow};

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{
    AccessLevel, CreateAccessLevelRequest, CreateDepartmentRequest, CreateDeviceRequest,
    CreateExchangeHistoryRequest, CreateFileLocationRequest, CreatePositionRequest, Department,
    Device, EmployeeDepartment, EmployeeDevice, ExchangeHistory, FileExchangeHistory,
    FileMainLocation, Position,
};

/// A table-backed entity that can be listed and created
#[async_trait]
pub trait Resource:
    for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Sync + Unpin + Sized + 'static
{
    /// Request body accepted by create
    type Create: DeserializeOwned + Send + 'static;

    const NAME: &'static str;
    const TABLE: &'static str;
    const ORDER_BY: &'static str;

    async fn insert(db: &Database, req: Self::Create) -> Result<Self>;
}

pub struct ResourceService;

impl ResourceService {
    pub async fn list<R: Resource>(db: &Database) -> Result<Vec<R>> {
        let sql = format!("SELECT * FROM {} ORDER BY {}", R::TABLE, R::ORDER_BY);
        let rows: Vec<R> = sqlx::query_as(&sql).fetch_all(db.pool()).await?;
        Ok(rows)
    }

    pub async fn create<R: Resource>(db: &Database, req: R::Create) -> Result<R> {
        let created = R::insert(db, req).await?;
        tracing::debug!("Created {}", R::NAME);
        Ok(created)
    }

    /// Fetch a single-key row by its id
    async fn get_by_id<R: Resource>(db: &Database, id: i64) -> Result<R> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", R::TABLE);
        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", R::NAME)))
    }
}

#[async_trait]
impl Resource for Department {
    type Create = CreateDepartmentRequest;

    const NAME: &'static str = "Department";
    const TABLE: &'static str = "departments";
    const ORDER_BY: &'static str = "id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        let result = sqlx::query("INSERT INTO departments (name, contact_info) VALUES (?, ?)")
            .bind(&req.name)
            .bind(&req.contact_info)
            .execute(db.pool())
            .await?;
        ResourceService::get_by_id(db, result.last_insert_rowid()).await
    }
}

#[async_trait]
impl Resource for Device {
    type Create = CreateDeviceRequest;

    const NAME: &'static str = "Device";
    const TABLE: &'static str = "devices";
    const ORDER_BY: &'static str = "id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        let result = sqlx::query("INSERT INTO devices (name, mac_address) VALUES (?, ?)")
            .bind(&req.name)
            .bind(&req.mac_address)
            .execute(db.pool())
            .await?;
        ResourceService::get_by_id(db, result.last_insert_rowid()).await
    }
}

#[async_trait]
impl Resource for Position {
    type Create = CreatePositionRequest;

    const NAME: &'static str = "Position";
    const TABLE: &'static str = "positions";
    const ORDER_BY: &'static str = "id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        let result = sqlx::query(
            "INSERT INTO positions (title, date_received, employee_id) VALUES (?, ?, ?)",
        )
        .bind(&req.title)
        .bind(req.date_received.to_rfc3339())
        .bind(req.employee_id)
        .execute(db.pool())
        .await?;
        ResourceService::get_by_id(db, result.last_insert_rowid()).await
    }
}

#[async_trait]
impl Resource for AccessLevel {
    type Create = CreateAccessLevelRequest;

    const NAME: &'static str = "AccessLevel";
    const TABLE: &'static str = "access_levels";
    const ORDER_BY: &'static str = "id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        let result = sqlx::query(
            "INSERT INTO access_levels (level_access, effective_period, position_id) VALUES (?, ?, ?)",
        )
        .bind(&req.level_access)
        .bind(req.effective_period.to_rfc3339())
        .bind(req.position_id)
        .execute(db.pool())
        .await?;
        ResourceService::get_by_id(db, result.last_insert_rowid()).await
    }
}

#[async_trait]
impl Resource for EmployeeDepartment {
    type Create = EmployeeDepartment;

    const NAME: &'static str = "EmployeeDepartment";
    const TABLE: &'static str = "employee_departments";
    const ORDER_BY: &'static str = "employee_id, department_id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        sqlx::query("INSERT INTO employee_departments (employee_id, department_id) VALUES (?, ?)")
            .bind(req.employee_id)
            .bind(req.department_id)
            .execute(db.pool())
            .await?;
        Ok(req)
    }
}

#[async_trait]
impl Resource for EmployeeDevice {
    type Create = EmployeeDevice;

    const NAME: &'static str = "EmployeeDevice";
    const TABLE: &'static str = "employee_devices";
    const ORDER_BY: &'static str = "employee_id, device_id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        sqlx::query("INSERT INTO employee_devices (employee_id, device_id) VALUES (?, ?)")
            .bind(req.employee_id)
            .bind(req.device_id)
            .execute(db.pool())
            .await?;
        Ok(req)
    }
}

#[async_trait]
impl Resource for ExchangeHistory {
    type Create = CreateExchangeHistoryRequest;

    const NAME: &'static str = "ExchangeHistory";
    const TABLE: &'static str = "exchange_histories";
    const ORDER_BY: &'static str = "id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        let result = sqlx::query(
            r#"
            INSERT INTO exchange_histories (exchange_date, exchange_status, employee_id, device_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(req.exchange_date.to_rfc3339())
        .bind(&req.exchange_status)
        .bind(req.employee_id)
        .bind(req.device_id)
        .execute(db.pool())
        .await?;
        ResourceService::get_by_id(db, result.last_insert_rowid()).await
    }
}

#[async_trait]
impl Resource for FileMainLocation {
    type Create = CreateFileLocationRequest;

    const NAME: &'static str = "FileMainLocation";
    const TABLE: &'static str = "file_locations";
    const ORDER_BY: &'static str = "id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        let result = sqlx::query("INSERT INTO file_locations (absolute_path, file_id) VALUES (?, ?)")
            .bind(&req.absolute_path)
            .bind(req.file_id)
            .execute(db.pool())
            .await?;
        ResourceService::get_by_id(db, result.last_insert_rowid()).await
    }
}

#[async_trait]
impl Resource for FileExchangeHistory {
    type Create = FileExchangeHistory;

    const NAME: &'static str = "FileExchangeHistory";
    const TABLE: &'static str = "file_exchange_histories";
    const ORDER_BY: &'static str = "file_id, exchange_history_id";

    async fn insert(db: &Database, req: Self::Create) -> Result<Self> {
        sqlx::query(
            "INSERT INTO file_exchange_histories (file_id, exchange_history_id) VALUES (?, ?)",
        )
        .bind(req.file_id)
        .bind(req.exchange_history_id)
        .execute(db.pool())
        .await?;
        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn db() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        sqlx::query("INSERT INTO employees (username, password_hash) VALUES ('e1', 'x')")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn ids_are_assigned_by_the_database() {
        let db = db().await;
        let a: Department = ResourceService::create(
            &db,
            CreateDepartmentRequest {
                name: "IT".to_string(),
                contact_info: "x100".to_string(),
            },
        )
        .await
        .unwrap();
        let b: Department = ResourceService::create(
            &db,
            CreateDepartmentRequest {
                name: "HR".to_string(),
                contact_info: String::new(),
            },
        )
        .await
        .unwrap();

        assert!(b.id > a.id);
        let all: Vec<Department> = ResourceService::list(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "IT");
    }

    #[tokio::test]
    async fn duplicate_composite_key_is_a_conflict() {
        let db = db().await;
        let _: Device = ResourceService::create(
            &db,
            CreateDeviceRequest {
                name: "Laptop".to_string(),
                mac_address: "00:11:22:33:44:55".to_string(),
            },
        )
        .await
        .unwrap();

        let link = EmployeeDevice {
            employee_id: 1,
            device_id: 1,
        };
        ResourceService::create::<EmployeeDevice>(&db, link.clone())
            .await
            .unwrap();
        let err = ResourceService::create::<EmployeeDevice>(&db, link)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn dangling_foreign_key_is_a_bad_request() {
        let db = db().await;
        let err = ResourceService::create::<Position>(
            &db,
            CreatePositionRequest {
                title: "Engineer".to_string(),
                date_received: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                employee_id: 999,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dates_are_stored_as_rfc3339() {
        let db = db().await;
        let position: Position = ResourceService::create(
            &db,
            CreatePositionRequest {
                title: "Engineer".to_string(),
                date_received: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
                employee_id: 1,
            },
        )
        .await
        .unwrap();
        assert_eq!(position.date_received, "2024-01-02T03:04:05+00:00");
    }
}
