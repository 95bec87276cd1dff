use config::{Config, Environment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub port: u16,
    pub environment: String,
    pub frontend_urls: Vec<String>,
    pub bcrypt_cost: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidFormat(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::InvalidFormat(err.to_string())
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let settings = Self::defaults()?
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Self::from_settings(&settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("storage_backend", "postgres")?
            .set_default("server_port", 8080_i64)?
            .set_default("environment", "development")?
            .set_default("cors_allowed_origins", "http://localhost:3000")?
            .set_default("bcrypt_cost", bcrypt::DEFAULT_COST as i64)?)
    }

    /// Keys are the lower-cased environment variable names.
    pub fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        let storage = match settings.get_string("storage_backend")?.to_lowercase().as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidFormat(format!(
                    "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                    other
                )))
            }
        };

        let database_url = settings
            .get_string("database_url")
            .ok()
            .filter(|url| !url.trim().is_empty());

        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVariable("DATABASE_URL".to_string()));
        }

        let port = settings
            .get_int("server_port")
            .ok()
            .and_then(|p| u16::try_from(p).ok())
            .ok_or_else(|| ConfigError::InvalidFormat("SERVER_PORT must be a valid port number".to_string()))?;

        let bcrypt_cost = settings
            .get_int("bcrypt_cost")
            .ok()
            .and_then(|c| u32::try_from(c).ok())
            .filter(|c| (4..=31).contains(c))
            .ok_or_else(|| ConfigError::InvalidFormat("BCRYPT_COST must be between 4 and 31".to_string()))?;

        // Parse allowed origins
        let frontend_urls = settings
            .get_string("cors_allowed_origins")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(AppConfig {
            storage,
            database_url,
            port,
            environment: settings.get_string("environment")?,
            frontend_urls,
            bcrypt_cost,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
