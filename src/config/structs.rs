use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - database: 数据库连接与重试
/// - logging: 日志输出
/// - shortlink: autogenerated short code namespace
/// - retention: age-based sweeping of stale entries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub shortlink: ShortLinkConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

impl StaticConfig {
    /// 从指定 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML > 默认值
    /// ENV 前缀：SL，分隔符：__
    /// 示例：SL__SHORTLINK__AUTOGENERATED_PREFIX=~
    ///
    /// A missing file is fine; a file or environment that does not parse or
    /// fails [`StaticConfig::validate`] is an error, never a silent fallback
    /// to defaults.
    pub fn try_load_from(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<StaticConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the registry cannot run with
    pub fn validate(&self) -> Result<()> {
        super::validators::validate_prefix(&self.shortlink.autogenerated_prefix)?;
        super::validators::validate_retention(&self.retention)?;
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// Short code settings
///
/// `autogenerated_prefix` namespaces every generated code. Changing it after
/// entries exist breaks resolution of those entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLinkConfig {
    #[serde(default = "default_autogenerated_prefix")]
    pub autogenerated_prefix: String,
}

/// 过期清理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,
    /// Entries not modified for this many days are swept
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
    /// Delay before the first sweep after startup
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
}

impl RetentionConfig {
    pub fn max_age(&self) -> Result<chrono::Duration> {
        super::validators::retention_age(self.max_age_days)
    }

    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_hours.saturating_mul(60 * 60))
    }

    pub fn initial_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.initial_delay_secs)
    }
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_database_url() -> String {
    "sqlite://shortlinks.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_autogenerated_prefix() -> String {
    "-".to_string()
}

fn default_retention_enabled() -> bool {
    true
}

fn default_max_age_days() -> u64 {
    365
}

fn default_interval_hours() -> u64 {
    24
}

fn default_initial_delay_secs() -> u64 {
    300
}

// ============================================================
// Default implementations
// ============================================================

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ShortLinkConfig {
    fn default() -> Self {
        Self {
            autogenerated_prefix: default_autogenerated_prefix(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            max_age_days: default_max_age_days(),
            interval_hours: default_interval_hours(),
            initial_delay_secs: default_initial_delay_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StaticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shortlink.autogenerated_prefix, "-");
        assert_eq!(config.retention.max_age().unwrap(), chrono::Duration::days(365));
    }

    #[test]
    fn test_sample_config_parses_back() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(
            parsed.database.database_url,
            StaticConfig::default().database.database_url
        );
        assert_eq!(parsed.retention.interval_hours, 24);
    }

    #[test]
    fn test_try_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("registry.toml");
        std::fs::write(
            &path,
            "[shortlink]\nautogenerated_prefix = \"~\"\n\n[retention]\nmax_age_days = 7\n",
        )
        .unwrap();

        let config = StaticConfig::try_load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.shortlink.autogenerated_prefix, "~");
        assert_eq!(config.retention.max_age_days, 7);
        assert_eq!(config.retention.interval_hours, 24);
    }

    #[test]
    fn test_try_load_rejects_empty_prefix() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("registry.toml");
        std::fs::write(&path, "[shortlink]\nautogenerated_prefix = \"\"\n").unwrap();

        assert!(StaticConfig::try_load_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_try_load_rejects_zero_interval() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("registry.toml");
        std::fs::write(&path, "[retention]\ninterval_hours = 0\n").unwrap();

        let err = StaticConfig::try_load_from(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, crate::errors::ShortLinkError::Config(_)));
    }

    #[test]
    fn test_max_age_out_of_range() {
        let retention = RetentionConfig {
            max_age_days: u64::MAX,
            ..RetentionConfig::default()
        };
        assert!(retention.max_age().is_err());

        let retention = RetentionConfig {
            max_age_days: 1_000_000_000_000,
            ..RetentionConfig::default()
        };
        assert!(retention.max_age().is_err());
    }
}
