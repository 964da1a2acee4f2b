use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_vehicle::aggregate::{Vehicle, VehicleDto};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a003_vehicle;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/vehicle
pub async fn list(CurrentUser(claims): CurrentUser, Query(query): Query<ListQuery>) -> AppResult<Json<Page<Vehicle>>> {
    Ok(Json(a003_vehicle::service::list(&claims, &query).await?))
}

/// GET /api/vehicle/lookup/:customer_id
pub async fn lookup_by_customer(
    CurrentUser(claims): CurrentUser,
    Path(customer_id): Path<String>,
) -> AppResult<Json<Vec<LookupItem>>> {
    Ok(Json(a003_vehicle::service::lookup_by_customer(&claims, &customer_id).await?))
}

/// GET /api/vehicle/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Vehicle>> {
    Ok(Json(a003_vehicle::service::get_by_id(&claims, &id).await?))
}

/// POST /api/vehicle
pub async fn upsert(CurrentUser(claims): CurrentUser, Json(dto): Json<VehicleDto>) -> AppResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a003_vehicle::service::update(&claims, dto).await?;
            id
        }
        None => a003_vehicle::service::create(&claims, dto).await?,
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/vehicle/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a003_vehicle::service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}
