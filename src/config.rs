use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr, time::Duration};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace: Duration,
    pub mongo: MongoConfig,
}

/// Document store settings for the favorites/cart buckets.
#[derive(Clone)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub auth_source: String,
    pub connect_timeout: Duration,
    /// Upper bound for each individual document-store call.
    pub operation_timeout: Duration,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub max_conn_idle_time: Duration,
    pub replica_set: String,
    pub ssl: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Pet store management API")]
pub struct Args {
    /// Host to bind to (overrides PETSTORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PETSTORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides PETSTORE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::from_lookup(args, |key| env::var(key).ok())?;
        Ok((cfg, migrate))
    }

    /// Build the configuration from CLI args, reading variables through
    /// `lookup`. Unset or empty variables fall back to their defaults.
    pub fn from_lookup<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let string = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let seconds = |key: &str, default: u64| -> Result<Duration> {
            Ok(Duration::from_secs(
                parse_var::<u64>(&var, key)?.unwrap_or(default),
            ))
        };

        let env_port = parse_var::<u16>(&var, "PETSTORE_PORT")?.unwrap_or(8080);

        let mongo = MongoConfig {
            host: string("MONGO_HOST", "localhost"),
            port: parse_var::<u16>(&var, "MONGO_PORT")?.unwrap_or(27017),
            username: string("MONGO_USERNAME", ""),
            password: string("MONGO_PASSWORD", ""),
            database: string("MONGO_DATABASE", "petstore"),
            auth_source: string("MONGO_AUTH_SOURCE", "admin"),
            connect_timeout: seconds("MONGO_CONNECT_TIMEOUT_SECS", 10)?,
            operation_timeout: seconds("MONGO_OPERATION_TIMEOUT_SECS", 5)?,
            max_pool_size: parse_var::<u32>(&var, "MONGO_MAX_POOL_SIZE")?.unwrap_or(100),
            min_pool_size: parse_var::<u32>(&var, "MONGO_MIN_POOL_SIZE")?.unwrap_or(5),
            max_conn_idle_time: seconds("MONGO_MAX_CONN_IDLE_SECS", 30)?,
            replica_set: string("MONGO_REPLICA_SET", ""),
            ssl: parse_var::<bool>(&var, "MONGO_SSL")?.unwrap_or(false),
        };

        // --- Merge ---
        Ok(Self {
            host: args
                .host
                .unwrap_or_else(|| string("PETSTORE_HOST", "0.0.0.0")),
            port: args.port.unwrap_or(env_port),
            database_url: args
                .database_url
                .unwrap_or_else(|| string("PETSTORE_DATABASE_URL", "sqlite://./data/petstore.db")),
            db_max_connections: parse_var::<u32>(&var, "PETSTORE_DB_MAX_CONNECTIONS")?
                .unwrap_or(5),
            shutdown_grace: seconds("PETSTORE_SHUTDOWN_GRACE_SECS", 10)?,
            mongo,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("parsing {} value `{}`", key, value))
        })
        .transpose()
}

impl MongoConfig {
    /// Connection string built from the individual settings. Credentials and
    /// `authSource` are included only when both username and password are set.
    pub fn uri(&self) -> String {
        let has_credentials = !self.username.is_empty() && !self.password.is_empty();
        let mut uri = if has_credentials {
            format!(
                "mongodb://{}:{}@{}:{}",
                self.username, self.password, self.host, self.port
            )
        } else {
            format!("mongodb://{}:{}", self.host, self.port)
        };

        let mut params = Vec::new();
        if has_credentials && !self.auth_source.is_empty() {
            params.push(format!("authSource={}", self.auth_source));
        }
        if !self.replica_set.is_empty() {
            params.push(format!("replicaSet={}", self.replica_set));
        }
        if self.ssl {
            params.push("ssl=true".to_string());
        }
        if !params.is_empty() {
            uri.push('?');
            uri.push_str(&params.join("&"));
        }
        uri
    }
}

// Keeps the password out of startup logs.
impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("database", &self.database)
            .field("auth_source", &self.auth_source)
            .field("connect_timeout", &self.connect_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .field("max_pool_size", &self.max_pool_size)
            .field("min_pool_size", &self.min_pool_size)
            .field("max_conn_idle_time", &self.max_conn_idle_time)
            .field("replica_set", &self.replica_set)
            .field("ssl", &self.ssl)
            .finish()
    }
}
