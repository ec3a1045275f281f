use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub record_api: RecordApiSettings,
    #[serde(default)]
    pub tables: TableSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub listings: ListingSettings,
    #[serde(default)]
    pub contact: ContactSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Credentials and endpoint of the hosted record API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordApiSettings {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub public_key: String,
    pub timeout_secs: Option<u64>,
}

/// Table names in the record API
#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_property_table")]
    pub property: String,
    #[serde(default = "default_agent_table")]
    pub agent: String,
    #[serde(default = "default_favorite_table")]
    pub favorite: String,
    #[serde(default = "default_compare_table")]
    pub compare_item: String,
    #[serde(default = "default_neighborhood_table")]
    pub neighborhood: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            property: default_property_table(),
            agent: default_agent_table(),
            favorite: default_favorite_table(),
            compare_item: default_compare_table(),
            neighborhood: default_neighborhood_table(),
        }
    }
}

fn default_property_table() -> String { "property".to_string() }
fn default_agent_table() -> String { "agent".to_string() }
fn default_favorite_table() -> String { "favorite".to_string() }
fn default_compare_table() -> String { "compare_item".to_string() }
fn default_neighborhood_table() -> String { "neighborhood".to_string() }

/// Where records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Remote,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_mode")]
    pub mode: DataMode,
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            mode: default_data_mode(),
            fixtures_dir: default_fixtures_dir(),
            mock_delay_ms: default_mock_delay_ms(),
        }
    }
}

fn default_data_mode() -> DataMode { DataMode::Mock }
fn default_fixtures_dir() -> PathBuf { PathBuf::from("fixtures") }
fn default_mock_delay_ms() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct ListingSettings {
    #[serde(default = "default_featured_limit")]
    pub featured_limit: usize,
    #[serde(default = "default_compare_max_items")]
    pub compare_max_items: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            featured_limit: default_featured_limit(),
            compare_max_items: default_compare_max_items(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_featured_limit() -> usize { 6 }
fn default_compare_max_items() -> usize { 4 }
fn default_cache_ttl_secs() -> u64 { 60 }
fn default_cache_capacity() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSettings {
    /// Probability that a simulated email send fails
    #[serde(default = "default_email_failure_rate")]
    pub email_failure_rate: f64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            email_failure_rate: default_email_failure_rate(),
        }
    }
}

fn default_email_failure_rate() -> f64 { 0.1 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with HOMESCOPE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., HOMESCOPE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_key_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_key_overrides(settings)?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("HOMESCOPE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Honour the project id / public key variables the web client is deployed with
fn apply_key_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(project_id) = env::var("VITE_APPER_PROJECT_ID") {
        builder = builder.set_override("record_api.project_id", project_id)?;
    }
    if let Ok(public_key) = env::var("VITE_APPER_PUBLIC_KEY") {
        builder = builder.set_override("record_api.public_key", public_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let listings = ListingSettings::default();
        assert_eq!(listings.featured_limit, 6);
        assert_eq!(listings.compare_max_items, 4);

        let data = DataSettings::default();
        assert_eq!(data.mode, DataMode::Mock);
        assert_eq!(data.mock_delay_ms, 300);

        assert_eq!(TableSettings::default().compare_item, "compare_item");
        assert_eq!(ContactSettings::default().email_failure_rate, 0.1);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let settings = Settings::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"))
            .unwrap();
        assert_eq!(settings.tables.property, "property");
        assert_eq!(settings.listings.compare_max_items, 4);
    }

    #[test]
    fn test_load_from_applies_key_overrides() {
        std::env::set_var("VITE_APPER_PUBLIC_KEY", "pk_from_env");
        let settings = Settings::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));
        std::env::remove_var("VITE_APPER_PUBLIC_KEY");

        assert_eq!(settings.unwrap().record_api.public_key, "pk_from_env");
    }
}
