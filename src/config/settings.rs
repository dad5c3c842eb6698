use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Capabilities advertised to the scheduling layer.
///
/// Static configuration, not measured at runtime. The scheduler reads these
/// before committing to a batch size or deadline; the dispatcher itself
/// never enforces them.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Largest recipient list to accept per batch
    #[serde(default = "default_max_recipients_per_batch")]
    pub max_recipients_per_batch: usize,
    /// Expected wall-clock budget for one batch, in seconds
    #[serde(default = "default_target_delivery_window_secs")]
    pub target_delivery_window_secs: u64,
}

fn default_max_recipients_per_batch() -> usize {
    100 // one transport call per recipient, keep batches conservative
}

fn default_target_delivery_window_secs() -> u64 {
    600 // 10 minutes; per-message latency dwarfs bulk HTTP APIs
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("provider.max_recipients_per_batch", 100)?
            .set_default("provider.target_delivery_window_secs", 600)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // PROVIDER_MAX_RECIPIENTS_PER_BATCH, PROVIDER_TARGET_DELIVERY_WINDOW_SECS
            .add_source(Environment::default().separator("_").try_parsing(true));

        builder.build()?.try_deserialize()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            max_recipients_per_batch: default_max_recipients_per_batch(),
            target_delivery_window_secs: default_target_delivery_window_secs(),
        }
    }
}
