use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{Result, ShortenerError};
use crate::utils::generate_secure_token;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，分隔符为 `__`，例如 SHORTENER__SERVER__PORT=9999
pub const ENV_PREFIX: &str = "SHORTENER";

/// Shortest and longest generated short codes
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// Upper bounds for token lifetimes
pub const MAX_ACCESS_TOKEN_MINUTES: u64 = 24 * 60;
pub const MAX_REFRESH_TOKEN_DAYS: u64 = 365;

/// 扁平环境变量到配置键的映射，优先级最高
const LEGACY_ENV_KEYS: [(&str, &str); 4] = [
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.database_url"),
    ("ACCESS_TOKEN_SECRET", "auth.access_token_secret"),
    ("REFRESH_TOKEN_SECRET", "auth.refresh_token_secret"),
];

/// 应用配置（启动时加载一次）
///
/// - server: 监听地址、端口、worker 数量
/// - database: 数据库连接配置
/// - auth: JWT 密钥与有效期
/// - features: 短码长度
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：PORT 等扁平变量 > SHORTENER__* > 配置文件 > 默认值
    pub fn load(path: Option<&str>) -> std::result::Result<Self, config::ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an injectable lookup for the flat variables
    pub fn load_with_env<F>(path: Option<&str>, lookup: F) -> std::result::Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        use config::{Config, Environment, File};

        // 显式指定的配置文件必须存在
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let mut builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_ENV_KEYS {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize::<AppConfig>()
    }

    /// 检查配置一致性
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ShortenerError::validation("server.port must not be 0"));
        }
        if self.database.database_url.trim().is_empty() {
            return Err(ShortenerError::database_config(
                "database.database_url must not be empty",
            ));
        }
        if !(1..=MAX_ACCESS_TOKEN_MINUTES).contains(&self.auth.access_token_minutes) {
            return Err(ShortenerError::validation(format!(
                "auth.access_token_minutes must be between 1 and {}",
                MAX_ACCESS_TOKEN_MINUTES
            )));
        }
        if !(1..=MAX_REFRESH_TOKEN_DAYS).contains(&self.auth.refresh_token_days) {
            return Err(ShortenerError::validation(format!(
                "auth.refresh_token_days must be between 1 and {}",
                MAX_REFRESH_TOKEN_DAYS
            )));
        }
        if !self.auth.access_token_secret.is_empty()
            && self.auth.access_token_secret == self.auth.refresh_token_secret
        {
            return Err(ShortenerError::validation(
                "auth.access_token_secret and auth.refresh_token_secret must differ",
            ));
        }
        Ok(())
    }

    /// 为空的 JWT 密钥生成随机值
    ///
    /// 随机密钥只在本次进程内有效，重启后已签发的 token 全部失效。
    pub fn ensure_secrets(&mut self) {
        if self.auth.access_token_secret.is_empty() {
            warn!("auth.access_token_secret is not set, using a random secret for this run");
            self.auth.access_token_secret = generate_secure_token(32);
        }
        if self.auth.refresh_token_secret.is_empty() {
            warn!("auth.refresh_token_secret is not set, using a random secret for this run");
            self.auth.refresh_token_secret = generate_secure_token(32);
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// Connect/acquire timeout in seconds
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
}

/// JWT 配置
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub access_token_secret: String,
    #[serde(default)]
    pub refresh_token_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: u64,
}

// 不在日志中输出密钥
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

impl FeaturesConfig {
    /// 短码长度，限制在 4..=32
    pub fn code_length(&self) -> usize {
        self.code_length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://shortener.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_access_token_minutes() -> u64 {
    5
}

fn default_refresh_token_days() -> u64 {
    1
}

fn default_code_length() -> usize {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: String::new(),
            refresh_token_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
            refresh_token_days: default_refresh_token_days(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.access_token_minutes, 5);
        assert_eq!(config.auth.refresh_token_days, 1);
        assert_eq!(config.features.code_length(), 6);
        assert!(config.server.workers >= 1);
    }

    #[test]
    fn test_code_length_is_clamped() {
        let short = FeaturesConfig { code_length: 1 };
        let long = FeaturesConfig { code_length: 500 };
        assert_eq!(short.code_length(), MIN_CODE_LENGTH);
        assert_eq!(long.code_length(), MAX_CODE_LENGTH);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9001\n\n[features]\ncode_length = 8\n\n[auth]\naccess_token_minutes = 15"
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = AppConfig::load_with_env(Some(&path), no_env).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.features.code_length(), 8);
        assert_eq!(config.auth.access_token_minutes, 15);
        // 未出现的字段使用默认值
        assert_eq!(config.auth.refresh_token_days, 1);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load_with_env(Some("/nonexistent/shortener.toml"), no_env);
        assert!(result.is_err());
    }

    #[test]
    fn test_flat_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 9001").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = AppConfig::load_with_env(Some(&path), |key| match key {
            "PORT" => Some("4000".to_string()),
            "DATABASE_URL" => Some("sqlite://override.db?mode=rwc".to_string()),
            "ACCESS_TOKEN_SECRET" => Some("access".to_string()),
            "REFRESH_TOKEN_SECRET" => Some("   ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.database_url, "sqlite://override.db?mode=rwc");
        assert_eq!(config.auth.access_token_secret, "access");
        // 空白值不覆盖
        assert!(config.auth.refresh_token_secret.is_empty());
    }

    #[test]
    fn test_validate_rejects_identical_secrets() {
        let mut config = AppConfig::default();
        config.auth.access_token_secret = "same".to_string();
        config.auth.refresh_token_secret = "same".to_string();
        assert!(config.validate().is_err());

        config.auth.refresh_token_secret = "other".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_ttl() {
        let mut config = AppConfig::default();
        config.auth.refresh_token_days = 200_000_000;
        assert!(matches!(
            config.validate(),
            Err(ShortenerError::Validation(_))
        ));

        config.auth.refresh_token_days = MAX_REFRESH_TOKEN_DAYS;
        assert!(config.validate().is_ok());

        config.auth.access_token_minutes = MAX_ACCESS_TOKEN_MINUTES + 1;
        assert!(matches!(
            config.validate(),
            Err(ShortenerError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ShortenerError::Validation(_))
        ));
    }

    #[test]
    fn test_ensure_secrets_fills_empty_values() {
        let mut config = AppConfig::default();
        config.ensure_secrets();
        assert_eq!(config.auth.access_token_secret.len(), 64);
        assert_ne!(
            config.auth.access_token_secret,
            config.auth.refresh_token_secret
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auth_debug_redacts_secrets() {
        let mut config = AppConfig::default();
        config.auth.access_token_secret = "super-secret-value".to_string();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn test_sample_config_parses_back() {
        let sample = AppConfig::generate_sample_config();
        let parsed: AppConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.features.code_length, 6);
    }
}
