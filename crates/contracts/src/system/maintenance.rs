use serde::{Deserialize, Serialize};

use crate::system::roles::Role;

/// Режим обслуживания: пока включён, изменять данные может только суперадмин
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceState {
    pub enabled: bool,
    pub message: String,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

impl MaintenanceState {
    pub fn blocks_writes_for(&self, role: Option<Role>) -> bool {
        self.enabled && role != Some(Role::SuperAdmin)
    }

    pub fn banner_text(&self) -> String {
        if self.message.trim().is_empty() {
            "The system is in maintenance mode. Changes are temporarily disabled.".to_string()
        } else {
            self.message.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMaintenanceDto {
    pub enabled: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCount {
    pub name: String,
    pub count: i64,
}

/// Ответ `GET /api/system/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub started_at: String,
    pub uptime_seconds: i64,
    pub database_ok: bool,
    pub database_latency_ms: i64,
    pub maintenance: MaintenanceState,
    pub record_counts: Vec<RecordCount>,
}

pub fn format_uptime(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_writes() {
        let state = MaintenanceState {
            enabled: true,
            ..Default::default()
        };
        assert!(state.blocks_writes_for(Some(Role::Admin)));
        assert!(state.blocks_writes_for(None));
        assert!(!state.blocks_writes_for(Some(Role::SuperAdmin)));
        assert!(!MaintenanceState::default().blocks_writes_for(Some(Role::Dealer)));
    }

    #[test]
    fn test_banner_text_falls_back() {
        let mut state = MaintenanceState::default();
        assert!(state.banner_text().contains("maintenance"));
        state.message = "Back at 18:00".into();
        assert_eq!(state.banner_text(), "Back at 18:00");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "0m 59s");
        assert_eq!(format_uptime(3_720), "1h 2m");
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
    }
}
