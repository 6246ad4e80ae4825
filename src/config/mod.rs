use std::env;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub request: RequestConfig,
    pub game: GameConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Circuit generator API configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
}

/// HTTP request configuration for generator calls
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

/// Game engine tuning
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Regeneration attempts before falling back to the emergency pool.
    pub max_generation_attempts: u32,
    /// Sessions older than this are swept.
    pub session_ttl_hours: i64,
    /// How often the background sweeper runs.
    pub sweep_interval_secs: u64,
}

/// HTTP server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let generator = GeneratorConfig {
            api_key: env::var("CIRCUITGEN_API_KEY").map_err(|_| AppError::Config {
                message: "CIRCUITGEN_API_KEY is required".to_string(),
            })?,
            base_url: env::var("CIRCUITGEN_BASE_URL")
                .unwrap_or_else(|_| "https://api.circuitgen.dev".to_string()),
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
            max_retries: env::var("MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: env::var("RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        };

        let game = GameConfig {
            max_generation_attempts: env::var("MAX_GENERATION_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
        };

        let server = ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            generator,
            request,
            game,
            server,
            logging,
        })
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_generation_attempts: 2,
            session_ttl_hours: 24,
            sweep_interval_secs: 3600,
        }
    }
}
