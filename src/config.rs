use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Minimum HS256 key length accepted from configuration
pub const MIN_SECRET_LEN: usize = 32;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_access_token_expire")]
    pub access_token_expire_minutes: u64,
    #[serde(default)]
    pub leeway_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// Files larger than this go to disk, the rest are stored inline
    #[serde(default = "default_inline_threshold")]
    pub inline_threshold_bytes: u64,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "data/assettrack.db".to_string()
}

fn default_jwt_secret() -> String {
    "change-me".to_string()
}

fn default_issuer() -> String {
    "MyAuthServer".to_string()
}

fn default_audience() -> String {
    "MyAuthClient".to_string()
}

fn default_access_token_expire() -> u64 {
    15
}

fn default_upload_path() -> String {
    "uploads".to_string()
}

fn default_inline_threshold() -> u64 {
    1024 * 1024
}

fn default_max_upload() -> usize {
    100 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            issuer: default_issuer(),
            audience: default_audience(),
            access_token_expire_minutes: default_access_token_expire(),
            leeway_seconds: 0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_path: default_upload_path(),
            inline_threshold_bytes: default_inline_threshold(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.ensure_directories()?;
        config.ensure_jwt_secret()?;
        tracing::info!(
            "JWT issuer={}, audience={}, lifetime={}m",
            config.jwt.issuer,
            config.jwt.audience,
            config.jwt.access_token_expire_minutes
        );
        Ok(config)
    }

    /// Ensure the signing secret is usable, generating and persisting one if unset
    fn ensure_jwt_secret(&mut self) -> anyhow::Result<()> {
        if self.jwt.secret == default_jwt_secret() || self.jwt.secret.is_empty() {
            let secret_path = Path::new("data/.jwt_secret");

            if secret_path.exists() {
                let secret = fs::read_to_string(secret_path)?;
                self.jwt.secret = secret.trim().to_string();
                tracing::info!("Loaded persisted JWT secret from data/.jwt_secret");
            } else {
                // Two v4 UUIDs give 64 hex chars of key material
                let secret = format!(
                    "{}{}",
                    uuid::Uuid::new_v4().simple(),
                    uuid::Uuid::new_v4().simple()
                );

                if let Some(parent) = secret_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::write(secret_path, &secret)?;
                self.jwt.secret = secret;
                tracing::info!("Generated and persisted new JWT secret to data/.jwt_secret");
            }
        }

        self.validate_jwt_secret()
    }

    fn validate_jwt_secret(&self) -> anyhow::Result<()> {
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            anyhow::bail!(
                "JWT secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                self.jwt.secret.len()
            );
        }
        Ok(())
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: AT_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(val) = lookup("AT_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("AT_CONF_SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        // Database
        if let Some(val) = lookup("AT_CONF_DATABASE_PATH") {
            self.database.path = val;
        }

        // JWT
        if let Some(val) = lookup("AT_CONF_JWT_SECRET") {
            self.jwt.secret = val;
        }
        if let Some(val) = lookup("AT_CONF_JWT_ISSUER") {
            self.jwt.issuer = val;
        }
        if let Some(val) = lookup("AT_CONF_JWT_AUDIENCE") {
            self.jwt.audience = val;
        }
        if let Some(minutes) = lookup("AT_CONF_JWT_ACCESS_EXPIRE").and_then(|v| v.parse().ok()) {
            self.jwt.access_token_expire_minutes = minutes;
        }
        if let Some(secs) = lookup("AT_CONF_JWT_LEEWAY").and_then(|v| v.parse().ok()) {
            self.jwt.leeway_seconds = secs;
        }

        // Storage
        if let Some(val) = lookup("AT_CONF_STORAGE_UPLOAD_PATH") {
            self.storage.upload_path = val;
        }
        if let Some(bytes) = lookup("AT_CONF_STORAGE_INLINE_THRESHOLD").and_then(|v| v.parse().ok())
        {
            self.storage.inline_threshold_bytes = bytes;
        }
        if let Some(bytes) = lookup("AT_CONF_STORAGE_MAX_UPLOAD").and_then(|v| v.parse().ok()) {
            self.storage.max_upload_bytes = bytes;
        }
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(&self.database.path).parent() {
            fs::create_dir_all(parent)?;
        }

        fs::create_dir_all(&self.storage.upload_path)?;

        Ok(())
    }
}
