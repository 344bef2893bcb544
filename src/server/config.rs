use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub database_url: String,
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    pub jwt_secret: String,

    /// 32-byte hex key used to encrypt stored broker passwords.
    pub credentials_encryption_key: String,

    #[serde(default = "default_broker_base_url")]
    pub broker_base_url: String,

    #[serde(default = "default_broker_timeout_secs")]
    pub broker_timeout_secs: u64,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    listen_addr: Option<String>,
    database_url: Option<String>,
    frontend_url: Option<String>,
    jwt_secret: Option<String>,
    credentials_encryption_key: Option<String>,
    broker_base_url: Option<String>,
    broker_timeout_secs: Option<u64>,
    log_dir: Option<String>,
    bcrypt_cost: Option<u32>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_frontend_url() -> String {
    "https://afiliado-win.vercel.app".to_string()
}

fn default_broker_base_url() -> String {
    "https://api.pixstrike.com".to_string()
}

fn default_broker_timeout_secs() -> u64 {
    15
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

/// `frontend_url` becomes the CORS origin, so it must be a bare http(s) origin.
fn validate_origin(frontend_url: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(frontend_url)
        .map_err(|e| format!("FRONTEND_URL is not a valid URL: {e}"))?;
    let bare = url.path() == "/" && url.query().is_none() && url.fragment().is_none();
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() || !bare {
        return Err(format!(
            "FRONTEND_URL must be an http(s) origin without a path, got {frontend_url}"
        ));
    }
    Ok(())
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path_str) => Self::read_file(Path::new(path_str))?,
            None => PartialServerConfig::default(),
        };

        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        Self::merge(env_config, file_config)
    }

    fn read_file(path: &Path) -> Result<PartialServerConfig, String> {
        if !path.exists() {
            return Ok(PartialServerConfig::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
    }

    /// Environment values win over file values.
    fn merge(env: PartialServerConfig, file: PartialServerConfig) -> Result<Self, String> {
        let config = ServerConfig {
            listen_addr: env
                .listen_addr
                .or(file.listen_addr)
                .unwrap_or_else(default_listen_addr),
            database_url: env
                .database_url
                .or(file.database_url)
                .ok_or("DATABASE_URL is required")?,
            frontend_url: env
                .frontend_url
                .or(file.frontend_url)
                .unwrap_or_else(default_frontend_url),
            jwt_secret: env
                .jwt_secret
                .or(file.jwt_secret)
                .ok_or("JWT_SECRET is required")?,
            credentials_encryption_key: env
                .credentials_encryption_key
                .or(file.credentials_encryption_key)
                .ok_or("CREDENTIALS_ENCRYPTION_KEY is required")?,
            broker_base_url: env
                .broker_base_url
                .or(file.broker_base_url)
                .unwrap_or_else(default_broker_base_url),
            broker_timeout_secs: env
                .broker_timeout_secs
                .or(file.broker_timeout_secs)
                .unwrap_or_else(default_broker_timeout_secs),
            log_dir: env.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
            bcrypt_cost: env
                .bcrypt_cost
                .or(file.bcrypt_cost)
                .unwrap_or_else(default_bcrypt_cost),
        };

        validate_origin(&config.frontend_url)?;

        if hex::decode(&config.credentials_encryption_key).map(|k| k.len()) != Ok(32) {
            return Err("CREDENTIALS_ENCRYPTION_KEY must be a 32-byte hex-encoded string".to_string());
        }

        Ok(config)
    }
}
