use std::path::PathBuf;
use std::time::Duration;

use eventdeck_core::motion::{MotionConfig, DEFAULT_EXIT_DISTANCE_PX};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; the in-memory
/// event source is used unless `EVENT_SOURCE` says otherwise.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Bearer token for `/admin` routes. Admin routes are refused when unset.
    pub admin_token: Option<String>,
    /// Requests per client per minute under `/api/v1`; `0` disables the limit.
    pub rate_limit_per_minute: u32,
    pub source: SourceConfig,
    pub deck: DeckConfig,
}

/// Which event backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// In-process events, optionally seeded from a JSON file.
    Memory { demo_events_path: Option<PathBuf> },
    Postgres { database_url: String },
    Rest { url: String, api_key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckConfig {
    /// Directory for persisted decisions. In-memory when unset.
    pub decisions_dir: Option<PathBuf>,
    pub motion: MotionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `ADMIN_TOKEN`           | unset                      |
    /// | `RATE_LIMIT_PER_MINUTE` | `120`                      |
    /// | `EVENT_SOURCE`          | `memory`                   |
    /// | `DATABASE_URL`          | required for `postgres`    |
    /// | `REST_URL`              | required for `rest`        |
    /// | `REST_API_KEY`          | required for `rest`        |
    /// | `DEMO_EVENTS_PATH`      | unset                      |
    /// | `DECISIONS_DIR`         | unset                      |
    /// | `SWIPE_THRESHOLD_PX`    | `100`                      |
    /// | `EXIT_ANIMATION_MS`     | `300`                      |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = var("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let rate_limit_per_minute: u32 = var("RATE_LIMIT_PER_MINUTE", "120")
            .parse()
            .expect("RATE_LIMIT_PER_MINUTE must be a valid u32");

        let source = match var("EVENT_SOURCE", "memory").trim() {
            "memory" => SourceConfig::Memory {
                demo_events_path: optional("DEMO_EVENTS_PATH").map(PathBuf::from),
            },
            "postgres" => SourceConfig::Postgres {
                database_url: optional("DATABASE_URL")
                    .expect("DATABASE_URL must be set when EVENT_SOURCE=postgres"),
            },
            "rest" => SourceConfig::Rest {
                url: optional("REST_URL").expect("REST_URL must be set when EVENT_SOURCE=rest"),
                api_key: optional("REST_API_KEY")
                    .expect("REST_API_KEY must be set when EVENT_SOURCE=rest"),
            },
            other => panic!("EVENT_SOURCE must be memory, postgres or rest, got '{other}'"),
        };

        let threshold_px: f64 = var("SWIPE_THRESHOLD_PX", "100")
            .parse()
            .expect("SWIPE_THRESHOLD_PX must be a number");
        assert!(
            threshold_px.is_finite() && threshold_px > 0.0,
            "SWIPE_THRESHOLD_PX must be positive"
        );

        let exit_ms: u64 = var("EXIT_ANIMATION_MS", "300")
            .parse()
            .expect("EXIT_ANIMATION_MS must be a valid u64");

        let deck = DeckConfig {
            decisions_dir: optional("DECISIONS_DIR").map(PathBuf::from),
            motion: MotionConfig {
                threshold_px,
                exit_duration: Duration::from_millis(exit_ms),
                exit_distance_px: DEFAULT_EXIT_DISTANCE_PX,
            },
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            admin_token: optional("ADMIN_TOKEN"),
            rate_limit_per_minute,
            source,
            deck,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.port, 3000);
        assert_eq!(c.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(c.rate_limit_per_minute, 120);
        assert_eq!(c.admin_token, None);
        assert_eq!(c.source, SourceConfig::Memory { demo_events_path: None });
        assert_eq!(c.deck.decisions_dir, None);
        assert_eq!(c.deck.motion, MotionConfig::default());
    }

    #[test]
    fn test_cors_origins_split_and_trimmed() {
        let c = config(&[("CORS_ORIGINS", "https://a.example, https://b.example,")]);
        assert_eq!(c.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_rest_source() {
        let c = config(&[
            ("EVENT_SOURCE", "rest"),
            ("REST_URL", "https://project.example.co"),
            ("REST_API_KEY", "anon"),
        ]);
        assert_eq!(
            c.source,
            SourceConfig::Rest {
                url: "https://project.example.co".to_string(),
                api_key: "anon".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_admin_token_disables_admin() {
        assert_eq!(config(&[("ADMIN_TOKEN", "  ")]).admin_token, None);
    }

    #[test]
    fn test_motion_overrides() {
        let c = config(&[("SWIPE_THRESHOLD_PX", "80"), ("EXIT_ANIMATION_MS", "150")]);
        assert_eq!(c.deck.motion.threshold_px, 80.0);
        assert_eq!(c.deck.motion.exit_duration, Duration::from_millis(150));
    }

    #[test]
    #[should_panic(expected = "DATABASE_URL must be set")]
    fn test_postgres_requires_database_url() {
        config(&[("EVENT_SOURCE", "postgres")]);
    }

    #[test]
    #[should_panic(expected = "EVENT_SOURCE must be")]
    fn test_unknown_source_rejected() {
        config(&[("EVENT_SOURCE", "sqlite")]);
    }
}
