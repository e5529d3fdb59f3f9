//! # Runtime Configuration Module
//!
//! Environment variable-based tuning for the router.
//!
//! ## Environment Variables
//!
//! ### `TRIEROUTER_PARAM_POOL_MAX_IDLE`
//!
//! Number of idle parameter buffers each tree keeps for reuse. Extra buffers
//! released beyond this bound are dropped.
//!
//! Default: `1024`
//!
//! ### `TRIEROUTER_SLOW_MATCH_US`
//!
//! Route match duration, in microseconds, above which a `warn!` is emitted.
//!
//! Default: `1000` (1 ms)
//!
//! Both accept decimal (`4096`) or hexadecimal (`0x1000`) values. A value
//! that does not parse falls back to the default.
//!
//! ## Usage
//!
//! ```rust
//! use trierouter::runtime_config::RouterConfig;
//! use trierouter::Router;
//!
//! let router = Router::with_config(RouterConfig::from_env());
//! assert!(router.is_empty());
//! ```

use std::env;
use std::time::Duration;

use crate::router::DEFAULT_POOL_MAX_IDLE;

/// Env var for [`RouterConfig::param_pool_max_idle`]
pub const PARAM_POOL_MAX_IDLE_VAR: &str = "TRIEROUTER_PARAM_POOL_MAX_IDLE";
/// Env var for [`RouterConfig::slow_match_us`]
pub const SLOW_MATCH_US_VAR: &str = "TRIEROUTER_SLOW_MATCH_US";

const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Router configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Idle parameter buffers retained per tree (default: 1024)
    pub param_pool_max_idle: usize,
    /// Slow-match warning threshold in microseconds (default: 1000)
    pub slow_match_us: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            param_pool_max_idle: DEFAULT_POOL_MAX_IDLE,
            slow_match_us: DEFAULT_SLOW_MATCH_US,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// [`from_env`](Self::from_env) is this with `std::env::var`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let param_pool_max_idle = lookup(PARAM_POOL_MAX_IDLE_VAR)
            .and_then(|v| parse_number(&v))
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(DEFAULT_POOL_MAX_IDLE);
        let slow_match_us = lookup(SLOW_MATCH_US_VAR)
            .and_then(|v| parse_number(&v))
            .unwrap_or(DEFAULT_SLOW_MATCH_US);
        RouterConfig {
            param_pool_max_idle,
            slow_match_us,
        }
    }

    /// The slow-match threshold as a [`Duration`]
    #[must_use]
    pub fn slow_match_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_match_us)
    }
}

fn parse_number(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
