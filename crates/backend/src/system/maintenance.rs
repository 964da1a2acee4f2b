//! Режим обслуживания: хранится в `sys_settings`, кэшируется в памяти.

use chrono::Utc;
use contracts::system::auth::TokenClaims;
use contracts::system::maintenance::{MaintenanceState, UpdateMaintenanceDto};
use contracts::system::roles::Permission;
use once_cell::sync::Lazy;
use std::sync::RwLock;

use crate::shared::config::MaintenanceConfig;
use crate::shared::data::settings;
use crate::shared::error::AppResult;
use crate::system::auth::guard;

const SETTINGS_KEY: &str = "maintenance";

static STATE: Lazy<RwLock<MaintenanceState>> = Lazy::new(|| RwLock::new(MaintenanceState::default()));

pub fn current() -> MaintenanceState {
    match STATE.read() {
        Ok(state) => state.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn set_current(state: MaintenanceState) {
    match STATE.write() {
        Ok(mut guard) => *guard = state,
        Err(poisoned) => *poisoned.into_inner() = state,
    }
}

/// Читает сохранённое состояние; при первом запуске берёт его из конфига
pub async fn load(seed: &MaintenanceConfig) -> anyhow::Result<()> {
    let state = match settings::get(SETTINGS_KEY).await? {
        Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("Stored maintenance state is invalid ({}), resetting", e);
            MaintenanceState::default()
        }),
        None => {
            let state = MaintenanceState {
                enabled: seed.enabled,
                message: seed.message.clone(),
                updated_at: Some(Utc::now().to_rfc3339()),
                updated_by: None,
            };
            save(&state).await?;
            state
        }
    };
    if state.enabled {
        tracing::warn!("Maintenance mode is ON: {}", state.banner_text());
    }
    set_current(state);
    Ok(())
}

async fn save(state: &MaintenanceState) -> anyhow::Result<()> {
    let json = serde_json::to_string(state)?;
    settings::put(SETTINGS_KEY, &json, "Maintenance mode state").await
}

pub async fn update(claims: &TokenClaims, dto: UpdateMaintenanceDto) -> AppResult<MaintenanceState> {
    guard::require(claims, Permission::ManageMaintenance)?;
    let state = MaintenanceState {
        enabled: dto.enabled,
        message: dto.message.trim().to_string(),
        updated_at: Some(Utc::now().to_rfc3339()),
        updated_by: Some(claims.username.clone()),
    };
    save(&state).await?;
    set_current(state.clone());
    tracing::warn!(
        "Maintenance mode {} by {}",
        if state.enabled { "enabled" } else { "disabled" },
        claims.username
    );
    Ok(state)
}
