use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `airtable.token`.
pub const TOKEN_ENV_VAR: &str = "PADDOCK_AIRTABLE_TOKEN";

/// Upper bound for `reconcile.window_days` (about ten years).
pub const MAX_WINDOW_DAYS: i64 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub airtable: AirtableConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirtableConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_base_id")]
    pub base_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub tables: TableIds,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

/// Airtable table ids for the three logical tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableIds {
    pub events: String,
    pub reservations: String,
    pub employees: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaffingSource {
    /// Resolve staff through the event's `PEOPLE RESERVED` link field.
    #[default]
    PeopleLink,
    /// Resolve staff by scanning the reservations table.
    Reservations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    #[serde(default)]
    pub staffing_source: StaffingSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Minutes between two scheduled refreshes.
    #[serde(default = "default_interval")]
    pub auto_update_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_workbook_path")]
    pub workbook_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_base_id() -> String {
    "app4p2TY96NofXW4u".to_string()
}
fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}
fn default_page_size() -> u32 {
    100
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    2
}
fn default_timeout() -> u64 {
    30
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_window_days() -> i64 {
    365
}
fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_interval() -> u64 {
    15
}
fn default_workbook_path() -> String {
    Config::config_dir()
        .join("calendar.xlsx")
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TableIds {
    fn default() -> Self {
        Self {
            events: "tblVb1BuNKkUoS96b".to_string(),
            reservations: "tbllmzrlZvphVWaP7".to_string(),
            employees: "tblzwiTaABBdqaJ3G".to_string(),
        }
    }
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_id: default_base_id(),
            api_url: default_api_url(),
            tables: TableIds::default(),
            page_size: default_page_size(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay(),
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            staffing_source: StaffingSource::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            auto_update_interval: default_interval(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            workbook_path: default_workbook_path(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            airtable: AirtableConfig::default(),
            reconcile: ReconcileConfig::default(),
            server: ServerConfig::default(),
            export: ExportConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.paddock`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".paddock")
    }

    /// Return the full path of the default config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("paddock.yaml")
    }

    /// Return the full path of the default SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("paddock.sqlite")
    }

    /// File contents only, or defaults if the file is missing.
    pub fn read_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        Ok(cfg)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        let days = self.reconcile.window_days;
        if !(1..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(AppError::Config(format!(
                "reconcile.window_days: {days} is outside 1..={MAX_WINDOW_DAYS}"
            )));
        }
        Ok(())
    }

    /// Load configuration from `path`, or return defaults if the file is missing.
    /// The token environment override is applied in both cases.
    pub fn load(path: &Path) -> AppResult<Self> {
        let mut cfg = Self::read_file(path)?;

        if let Ok(token) = env::var(TOKEN_ENV_VAR)
            && !token.trim().is_empty()
        {
            cfg.airtable.token = token;
        }

        Ok(cfg)
    }

    /// Write the configuration as YAML, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// True when the record store can be queried.
    pub fn is_configured(&self) -> bool {
        !self.airtable.token.trim().is_empty() && !self.airtable.base_id.trim().is_empty()
    }

    /// Fail with a user-facing message when credentials are missing.
    pub fn ensure_configured(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        if self.airtable.token.trim().is_empty() {
            missing.push("airtable.token");
        }
        if self.airtable.base_id.trim().is_empty() {
            missing.push("airtable.base_id");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::NotConfigured(format!(
                "missing {} (set them with `paddock config --set` or the /config page)",
                missing.join(", ")
            )))
        }
    }

    /// Update a single dotted key, e.g. `server.port=8080`.
    pub fn set_value(&mut self, key: &str, value: &str) -> AppResult<()> {
        let parse_u64 = |v: &str| {
            v.parse::<u64>()
                .map_err(|_| AppError::Config(format!("{key}: expected a positive integer")))
        };
        let parse_u32 = |v: &str| {
            v.parse::<u32>().map_err(|_| {
                AppError::Config(format!("{key}: expected an integer between 0 and {}", u32::MAX))
            })
        };

        match key {
            "database" => self.database = value.to_string(),
            "airtable.token" => self.airtable.token = value.to_string(),
            "airtable.base_id" => self.airtable.base_id = value.to_string(),
            "airtable.api_url" => self.airtable.api_url = value.to_string(),
            "airtable.tables.events" => self.airtable.tables.events = value.to_string(),
            "airtable.tables.reservations" => self.airtable.tables.reservations = value.to_string(),
            "airtable.tables.employees" => self.airtable.tables.employees = value.to_string(),
            "airtable.max_retries" => self.airtable.max_retries = parse_u32(value)?,
            "airtable.retry_delay_secs" => self.airtable.retry_delay_secs = parse_u64(value)?,
            "airtable.timeout_secs" => self.airtable.timeout_secs = parse_u64(value)?,
            "airtable.cache_ttl_secs" => self.airtable.cache_ttl_secs = parse_u64(value)?,
            "reconcile.window_days" => {
                let days = value
                    .parse::<i64>()
                    .ok()
                    .filter(|d| (1..=MAX_WINDOW_DAYS).contains(d))
                    .ok_or_else(|| {
                        AppError::Config(format!("{key}: expected a number of days in 1..={MAX_WINDOW_DAYS}"))
                    })?;
                self.reconcile.window_days = days;
            }
            "reconcile.staffing_source" => {
                self.reconcile.staffing_source = match value {
                    "people_link" => StaffingSource::PeopleLink,
                    "reservations" => StaffingSource::Reservations,
                    other => {
                        return Err(AppError::Config(format!(
                            "{key}: unknown staffing source '{other}' (people_link|reservations)"
                        )));
                    }
                }
            }
            "server.bind" => self.server.bind = value.to_string(),
            "server.port" => {
                self.server.port = value
                    .parse()
                    .map_err(|_| AppError::Config(format!("{key}: invalid port '{value}'")))?
            }
            "server.auto_update_interval" => {
                let minutes = parse_u64(value)?;
                if minutes == 0 {
                    return Err(AppError::Config(format!("{key}: must be at least 1 minute")));
                }
                self.server.auto_update_interval = minutes;
            }
            "export.workbook_path" => self.export.workbook_path = value.to_string(),
            "log.level" => self.log.level = value.to_string(),
            "log.file" => {
                self.log.file = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            other => return Err(AppError::Config(format!("unknown key '{other}'"))),
        }
        Ok(())
    }

    /// Copy of the config with the token masked, for printing.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.airtable.token.is_empty() {
            let visible: String = copy.airtable.token.chars().take(4).collect();
            copy.airtable.token = format!("{visible}…");
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.airtable.cache_ttl_secs, 300);
        assert_eq!(cfg.airtable.max_retries, 3);
        assert_eq!(cfg.server.auto_update_interval, 15);
        assert_eq!(cfg.reconcile.window_days, 365);
        assert_eq!(cfg.reconcile.staffing_source, StaffingSource::PeopleLink);
        assert!(!cfg.is_configured());
    }

    #[test]
    fn set_value_updates_nested_keys() {
        let mut cfg = Config::default();
        cfg.set_value("server.port", "8081").unwrap();
        cfg.set_value("reconcile.staffing_source", "reservations")
            .unwrap();
        cfg.set_value("airtable.token", "patXYZ").unwrap();

        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.reconcile.staffing_source, StaffingSource::Reservations);
        assert!(cfg.is_configured());
        assert!(cfg.set_value("server.nope", "1").is_err());
        assert!(cfg.set_value("server.auto_update_interval", "0").is_err());
    }

    #[test]
    fn window_days_must_stay_in_range() {
        let mut cfg = Config::default();
        cfg.set_value("reconcile.window_days", "3650").unwrap();
        assert_eq!(cfg.reconcile.window_days, 3650);

        assert!(cfg.set_value("reconcile.window_days", "100000000").is_err());
        assert!(cfg.set_value("reconcile.window_days", "0").is_err());
        assert!(cfg.set_value("reconcile.window_days", "-5").is_err());
        assert_eq!(cfg.reconcile.window_days, 3650);
    }

    #[test]
    fn max_retries_rejects_values_beyond_u32() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("airtable.max_retries", "4294967297").is_err());
        assert_eq!(cfg.airtable.max_retries, 3);
        cfg.set_value("airtable.max_retries", "5").unwrap();
        assert_eq!(cfg.airtable.max_retries, 5);
    }

    #[test]
    fn read_file_rejects_out_of_range_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paddock.yaml");
        fs::write(&path, "reconcile:\n  window_days: 100000000\n").unwrap();

        let err = Config::read_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("window_days"));
    }

    #[test]
    fn ensure_configured_names_missing_fields() {
        let cfg = Config::default();
        let err = cfg.ensure_configured().unwrap_err().to_string();
        assert!(err.contains("airtable.token"));
    }

    #[test]
    fn redacted_hides_token() {
        let mut cfg = Config::default();
        cfg.airtable.token = "patSECRETSECRET".to_string();
        assert_eq!(cfg.redacted().airtable.token, "patS…");
    }
}
