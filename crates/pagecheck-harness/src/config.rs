//! Harness configuration: defaults, an optional `pagecheck.toml`, and
//! `PAGECHECK_*` environment overrides, merged in that order.

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::variant::{BrowserFamily, BrowserVariant};
use crate::wait::WaitConfig;

/// Default wait budget for a test case (10 seconds).
const DEFAULT_WAIT_BUDGET_MS: u64 = 10_000;

/// Default poll interval for progressive assertions (10ms).
const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

static CACHED: Lazy<HarnessConfig> = Lazy::new(|| {
    HarnessConfig::load().unwrap_or_else(|err| {
        warn!(%err, "falling back to default harness configuration");
        HarnessConfig::default()
    })
});

/// Tunable harness defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Per-case quiescence budget, in milliseconds.
    pub wait_budget_ms: u64,
    /// Poll interval for progressive assertions, in milliseconds.
    pub poll_interval_ms: u64,
    /// Variant assumed when a case does not pick one.
    pub default_variant: BrowserVariant,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            wait_budget_ms: DEFAULT_WAIT_BUDGET_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            default_variant: BrowserVariant::new(BrowserFamily::Chromium, 120),
        }
    }
}

impl HarnessConfig {
    /// Loads the merged configuration: defaults, then `pagecheck.toml` in
    /// the working directory (if present), then `PAGECHECK_*` env vars.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a layer fails to parse or merge.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("pagecheck.toml"))
    }

    /// Like [`load`](Self::load) with an explicit config-file path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a layer fails to parse or merge.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PAGECHECK_"))
            .extract()?;
        Ok(config)
    }

    /// The process-wide configuration, loaded once; falls back to defaults
    /// (with a warning) when loading fails.
    #[must_use]
    pub fn cached() -> &'static Self {
        &CACHED
    }

    /// The per-case quiescence budget.
    #[must_use]
    pub fn wait_budget(&self) -> Duration {
        Duration::from_millis(self.wait_budget_ms)
    }

    /// The progressive-assertion poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// A [`WaitConfig`] derived from the budget and poll interval.
    #[must_use]
    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig::new(self.wait_budget(), self.poll_interval())
    }
}
