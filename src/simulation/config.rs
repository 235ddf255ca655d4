use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default location of the TOML configuration file.
#[cfg(feature = "cli")]
const DEFAULT_CONFIG_PATH: &str = "config/simulation.toml";

/// Context string used when none is configured.
pub const DEFAULT_CONTEXT: &str = "FiatShamirDemo2025";

/// Forgery simulation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Round counts to simulate, one experiment each.
    pub k_values: Vec<usize>,
    /// Forgery attempts per round count.
    pub trials: u64,
    /// Bit length of the subgroup order generated for each experiment.
    pub bits: u64,
    /// Context the verifier is bound to.
    pub context: String,
    /// Seed for a reproducible run; fresh OS randomness when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            k_values: vec![1, 5, 10, 20],
            trials: 10_000,
            bits: 128,
            context: DEFAULT_CONTEXT.to_string(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Loads configuration from `.env` file, TOML file, and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `FS_` prefix (e.g., `FS_TRIALS=50000`)
    /// 2. TOML configuration file (if exists)
    /// 3. Built-in defaults
    ///
    /// Variables set in a `.env` file count as environment variables. The TOML
    /// file path can be set via `FS_CONFIG_PATH`; it defaults to
    /// `./config/simulation.toml` and is skipped when missing.
    ///
    /// # Environment Variable Examples
    /// ```bash
    /// FS_K_VALUES=[1,2,4,8]
    /// FS_TRIALS=50000
    /// FS_BITS=16
    /// FS_CONTEXT=my-app
    /// FS_SEED=7
    /// ```
    ///
    /// # Errors
    /// Returns an error if a source is malformed or holds a value of the wrong type.
    #[cfg(feature = "cli")]
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        // Attempt to load .env file (silently ignore if it doesn't exist)
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("FS_CONFIG_PATH")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("FS_"))
            .extract()
    }

    /// Checks that the settings describe a runnable experiment.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParams`] for an empty or zero round count, zero
    /// trials, or an order bit length below 2.
    pub fn validate(&self) -> Result<()> {
        if self.k_values.is_empty() {
            return Err(Error::InvalidParams("k_values cannot be empty".to_string()));
        }

        if self.k_values.contains(&0) {
            return Err(Error::InvalidParams(
                "k_values must all be at least 1".to_string(),
            ));
        }

        if self.trials == 0 {
            return Err(Error::InvalidParams("trials cannot be zero".to_string()));
        }

        if self.bits < 2 {
            return Err(Error::InvalidParams(format!(
                "bits must be at least 2, got {}",
                self.bits
            )));
        }

        Ok(())
    }
}
