//! # Event Queue Configuration
//!
//! Selects the listener store strategy for queues built with
//! [`ExecutionEventQueue::from_config`](crate::events::ExecutionEventQueue::from_config).
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults (`store_policy = "locked"`)
//! 2. an optional TOML/YAML/JSON file passed to [`EventQueueConfig::load`]
//! 3. `EXECUTION_EVENTS_*` environment variables (single `_` after the prefix), e.g.
//!    `EXECUTION_EVENTS_STORE_POLICY=copy_on_write`
//!
//! Both loaders read the policy through `StorePolicy`'s `FromStr`, so they accept the
//! same spellings (`locked`, `lock`, `mutex`, `copy_on_write`, `copy-on-write`, `cow`).

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{EventQueueError, Result};
use crate::events::store::StorePolicy;

pub const ENV_PREFIX: &str = "EXECUTION_EVENTS";
pub const STORE_POLICY_ENV: &str = "EXECUTION_EVENTS_STORE_POLICY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventQueueConfig {
    /// Concurrency strategy of the listener store
    pub store_policy: StorePolicy,
}

impl EventQueueConfig {
    /// Defaults overridden by `EXECUTION_EVENTS_STORE_POLICY`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(policy) = lookup(STORE_POLICY_ENV) {
            config.store_policy =
                policy
                    .parse()
                    .map_err(|e: String| EventQueueError::Configuration {
                        reason: format!("Invalid {STORE_POLICY_ENV}: {e}"),
                    })?;
        }

        Ok(config)
    }

    /// Layer an optional configuration file and the environment over the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// `load` with an explicit environment; `None` reads the process environment
    fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder =
            Config::builder().set_default("store_policy", StorePolicy::default().to_string())?;

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading event queue configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        debug!(store_policy = %config.store_policy, "Event queue configuration loaded");
        Ok(config)
    }
}
