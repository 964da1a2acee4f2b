use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    #[serde(default)]
    pub housekeeping: HousekeepingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_access_token_hours")]
    pub access_token_hours: i64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
    #[serde(default = "default_bootstrap_username")]
    pub bootstrap_username: String,
    #[serde(default = "default_bootstrap_password")]
    pub bootstrap_password: String,
}

/// Начальное состояние режима обслуживания (только для первого запуска)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MaintenanceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HousekeepingConfig {
    /// cron-выражение, первое поле - секунды
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_access_token_hours() -> i64 {
    24
}

fn default_refresh_token_days() -> i64 {
    30
}

fn default_bootstrap_username() -> String {
    "superadmin".to_string()
}

fn default_bootstrap_password() -> String {
    "superadmin".to_string()
}

fn default_schedule() -> String {
    "0 */15 * * * *".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_hours: default_access_token_hours(),
            refresh_token_days: default_refresh_token_days(),
            bootstrap_username: default_bootstrap_username(),
            bootstrap_password: default_bootstrap_password(),
        }
    }
}

impl Default for HousekeepingConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
static_dir = "dist"

[database]
path = "target/db/insurance.db"

[auth]
access_token_hours = 24
refresh_token_days = 30
bootstrap_username = "superadmin"
bootstrap_password = "superadmin"

[maintenance]
enabled = false
message = ""

[housekeeping]
schedule = "0 */15 * * * *"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Загрузить конфигурацию один раз и сохранить для всего процесса
pub fn init() -> anyhow::Result<&'static Config> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Текущая конфигурация; до `init()` - встроенная по умолчанию
pub fn current() -> &'static Config {
    CONFIG.get_or_init(|| {
        load_config().unwrap_or_else(|e| {
            tracing::error!("Failed to load config, using defaults: {}", e);
            Config {
                server: ServerConfig::default(),
                database: DatabaseConfig {
                    path: "target/db/insurance.db".to_string(),
                },
                auth: AuthConfig::default(),
                maintenance: MaintenanceConfig::default(),
                housekeeping: HousekeepingConfig::default(),
            }
        })
    })
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/insurance.db");
        assert_eq!(config.server.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.auth.access_token_hours, 24);
        assert!(!config.maintenance.enabled);
        assert_eq!(config.housekeeping.schedule, "0 */15 * * * *");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/var/lib/agency/app.db"

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.auth.refresh_token_days, 30);
        assert_eq!(config.auth.bootstrap_username, "superadmin");
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/var/lib/agency/app.db")
        );
    }
}
