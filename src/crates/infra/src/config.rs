use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    /// 分页接口未指定 limit 时的默认值
    default_page_limit: u64,
    server: RawServerConfig,
    database: RawDatabaseConfig,
    log: RawLogConfig,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 5,
            server: RawServerConfig::default(),
            database: RawDatabaseConfig::default(),
            log: RawLogConfig::default(),
        }
    }
}

/// 服务器配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    /// 监听地址
    host: String,
    /// 监听端口
    port: u16,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// 数据库配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDatabaseConfig {
    url: String,
    max_connections: u32,
    min_connections: u32,
    connect_timeout_secs: u64,
    acquire_timeout_secs: u64,
    sqlx_logging: bool,
    /// 启动时是否建表（CREATE TABLE IF NOT EXISTS）
    create_schema: bool,
}

impl Default for RawDatabaseConfig {
    fn default() -> Self {
        Self {
            url: "".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 60,
            acquire_timeout_secs: 8,
            sqlx_logging: false,
            create_schema: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLogConfig {
    level: String,
    /// 日志文件路径，空字符串表示只输出到控制台
    file: String,
}

impl Default for RawLogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "app.log".to_string(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 数据库连接池配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
    pub create_schema: bool,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfigImpl {
    default_page_limit: u64,
    server: ServerConfig,
    database: DatabaseConfig,
    log: LogConfig,
}

impl AppConfigImpl {
    fn new(data: RawConfig) -> Self {
        let server = ServerConfig {
            host: data.server.host,
            port: data.server.port,
        };
        let database = DatabaseConfig {
            url: data.database.url,
            max_connections: data.database.max_connections,
            min_connections: data.database.min_connections,
            connect_timeout: Duration::from_secs(data.database.connect_timeout_secs),
            acquire_timeout: Duration::from_secs(data.database.acquire_timeout_secs),
            sqlx_logging: data.database.sqlx_logging,
            create_schema: data.database.create_schema,
        };
        let log = LogConfig {
            level: data.log.level,
            file: Some(data.log.file).filter(|f| !f.trim().is_empty()),
        };
        AppConfigImpl {
            default_page_limit: data.default_page_limit,
            server,
            database,
            log,
        }
    }

    /// 加载顺序：.env -> config.{toml,yaml,...}（可选）-> APP_ 前缀环境变量
    pub fn load() -> Result<AppConfigImpl, ConfigError> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<AppConfigImpl, ConfigError> {
        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        if raw.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database.url must not be empty".to_string(),
            ));
        }
        if raw.default_page_limit == 0 {
            return Err(ConfigError::Invalid(
                "default_page_limit must be greater than 0".to_string(),
            ));
        }
        Ok(AppConfigImpl::new(raw))
    }

    pub fn default_page_limit(&self) -> u64 {
        self.default_page_limit
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone()
    }

    pub fn database(&self) -> DatabaseConfig {
        self.database.clone()
    }

    pub fn log(&self) -> LogConfig {
        self.log.clone()
    }
}
