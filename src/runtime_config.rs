// =============================================================================
// Runtime Configuration: server and order-bridge settings
// =============================================================================
//
// Loaded once at startup from a JSON file. All fields carry
// `#[serde(default)]` so a partial (or empty) file still deserialises, and a
// missing file falls back to the defaults with a warning at the call site.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::broker::{FillPolicy, TimeInForce};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "vwap_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_bind_addr() -> String {
    "127.0.0.1:5080".to_string()
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_log_preview_chars() -> usize {
    200
}

fn default_lot() -> f64 {
    0.01
}

fn default_sl_offset() -> f64 {
    100.0
}

fn default_tp_offset() -> f64 {
    150.0
}

fn default_deviation() -> u32 {
    10
}

fn default_magic() -> u64 {
    2_222_222
}

fn default_comment() -> String {
    "vwap signal".to_string()
}

// =============================================================================
// ExecutionParams
// =============================================================================

/// Order parameters used when a signal is turned into a broker order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Order volume in lots.
    #[serde(default = "default_lot")]
    pub lot: f64,

    /// Stop-loss distance from the entry, in price units.
    #[serde(default = "default_sl_offset")]
    pub sl_offset: f64,

    /// Take-profit distance from the entry, in price units.
    #[serde(default = "default_tp_offset")]
    pub tp_offset: f64,

    /// Maximum accepted slippage, in points.
    #[serde(default = "default_deviation")]
    pub deviation: u32,

    /// Identifying tag attached to every order.
    #[serde(default = "default_magic")]
    pub magic: u64,

    #[serde(default = "default_comment")]
    pub comment: String,

    #[serde(default)]
    pub time_in_force: TimeInForce,

    #[serde(default)]
    pub fill_policy: FillPolicy,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            lot: default_lot(),
            sl_offset: default_sl_offset(),
            tp_offset: default_tp_offset(),
            deviation: default_deviation(),
            magic: default_magic(),
            comment: default_comment(),
            time_in_force: TimeInForce::default(),
            fill_policy: FillPolicy::default(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the signal server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- HTTP server ---------------------------------------------------------

    /// Address the API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// How many leading characters of each payload are logged at debug level.
    #[serde(default = "default_log_preview_chars")]
    pub log_preview_chars: usize,

    /// Attach a permissive CORS layer to the router.
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    // --- Order bridge --------------------------------------------------------

    /// Order parameters for library callers of
    /// [`execute_signal`](crate::execution::execute_signal). The HTTP server
    /// only returns signals and never reads this section.
    #[serde(default)]
    pub execution: ExecutionParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
            log_preview_chars: default_log_preview_chars(),
            enable_cors: true,
            execution: ExecutionParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or malformed file is an error so the caller can decide to
    /// fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            max_body_bytes = config.max_body_bytes,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides on top of the loaded values.
    pub fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("VWAP_BIND_ADDR") {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }
    }
}
