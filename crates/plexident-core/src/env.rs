// Environment detection and logger configuration.

use std::sync::OnceLock;

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

/// Detect the current environment mode from environment variables.
/// Checks `PLEXIDENT_ENV` and `RUST_ENV` in order.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("PLEXIDENT_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default()
            .to_lowercase();

        match env_val.as_str() {
            "production" | "prod" => EnvMode::Production,
            "test" | "testing" => EnvMode::Test,
            _ => EnvMode::Development,
        }
    })
}

pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

pub fn is_development() -> bool {
    detect_env_mode() == EnvMode::Development
}

pub fn is_test() -> bool {
    detect_env_mode() == EnvMode::Test
}

/// Base URL of the Plexident API, from `PLEXIDENT_API_URL`.
/// Falls back to the local development server.
pub fn api_url_from_env() -> String {
    std::env::var("PLEXIDENT_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Initialize the `tracing` subscriber.
///
/// The filter comes from `PLEXIDENT_LOG`, then `RUST_LOG`, then a
/// per-mode default (info in production, debug otherwise).
pub fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("PLEXIDENT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            if is_production() {
                EnvFilter::new("plexident=info")
            } else {
                EnvFilter::new("plexident=debug")
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}
