use axum::extract::Json;
use contracts::system::maintenance::{MaintenanceState, SystemStatus, UpdateMaintenanceDto};
use contracts::system::roles::Resource;

use crate::shared::error::AppResult;
use crate::system::auth::{extractor::CurrentUser, guard};
use crate::system::{maintenance, status};

/// GET /api/system/status
pub async fn system_status(CurrentUser(claims): CurrentUser) -> AppResult<Json<SystemStatus>> {
    guard::require_view(&claims, Resource::SystemStatus)?;
    Ok(Json(status::system_status().await))
}

/// GET /api/system/maintenance, без авторизации: баннер виден и на странице входа
pub async fn get_maintenance() -> Json<MaintenanceState> {
    Json(maintenance::current())
}

/// PUT /api/system/maintenance
pub async fn set_maintenance(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<UpdateMaintenanceDto>,
) -> AppResult<Json<MaintenanceState>> {
    Ok(Json(maintenance::update(&claims, dto).await?))
}
