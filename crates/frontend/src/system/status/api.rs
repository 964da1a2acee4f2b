use contracts::system::maintenance::{MaintenanceState, SystemStatus, UpdateMaintenanceDto};

use crate::shared::api_utils;

/// Публичный эндпоинт, доступен и без входа
pub async fn get_maintenance() -> Result<MaintenanceState, String> {
    api_utils::get("/api/system/maintenance").await
}

pub async fn get_status() -> Result<SystemStatus, String> {
    api_utils::get("/api/system/status").await
}

pub async fn set_maintenance(dto: &UpdateMaintenanceDto) -> Result<MaintenanceState, String> {
    api_utils::put("/api/system/maintenance", dto).await
}
