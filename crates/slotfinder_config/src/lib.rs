use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod models;
pub use config::ConfigError;
pub use models::*;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "SLOTFINDER";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Loads the layered application configuration.
///
/// Sources, later ones winning:
/// 1. `{CONFIG_DIR}/default.(toml|yaml|json)`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.(toml|yaml|json)`
/// 3. Environment variables such as `SLOTFINDER__SCHEDULER__STEP_MINUTES=15`
///
/// `CONFIG_DIR` defaults to `config`, `RUN_ENV` to `debug` and the prefix
/// (`PREFIX`) to `SLOTFINDER`. Missing files are fine; every field has a default.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!(
        "Loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(CONFIG_SEPARATOR));

    let config: AppConfig = builder.build()?.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

/// Rejects scheduler settings the engine cannot work with.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let scheduler = &config.scheduler;
    if scheduler.default_start_hour >= scheduler.default_end_hour || scheduler.default_end_hour > 24 {
        return Err(ConfigError::Message(format!(
            "scheduler hours must satisfy start < end <= 24, got {}..{}",
            scheduler.default_start_hour, scheduler.default_end_hour
        )));
    }
    if scheduler.step_minutes == 0 || 1440 % scheduler.step_minutes != 0 {
        return Err(ConfigError::Message(format!(
            "scheduler.step_minutes must divide a day evenly, got {}",
            scheduler.step_minutes
        )));
    }
    if scheduler.default_max_suggestions == 0 {
        return Err(ConfigError::Message(
            "scheduler.default_max_suggestions must be positive".to_string(),
        ));
    }
    for (zone, days) in &scheduler.work_week_overrides {
        if days.is_empty() || days.iter().any(|d| *d > 6) {
            return Err(ConfigError::Message(format!(
                "work week for {zone} must list weekday indices 0..=6, got {days:?}"
            )));
        }
    }
    Ok(())
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is taken from `DOTENV_OVERRIDE` when set, otherwise `.env`. Loading
/// happens at most once per process; a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
