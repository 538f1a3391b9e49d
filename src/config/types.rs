use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub harness: HarnessConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Settings applied to every view model interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Label of the tracing span each interface runs in.
    #[serde(default = "default_engine_name")]
    pub name: String,
}

/// Timing of the test harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Longest wait for outputs before the test fails (default: 2000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Interval between condition checks (default: 100).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Settings of the demo binary and its fake services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Product loaded by the product page (default: "10").
    #[serde(default = "default_product_id")]
    pub product_id: String,
    /// Simulated network latency in milliseconds (default: 250).
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Use the v2 product endpoint.
    #[serde(default)]
    pub use_v2_api: bool,
    /// Search debounce interval in milliseconds (default: 300).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl HarnessConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl DemoConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_engine_name() -> String {
    "ViewModel".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_product_id() -> String {
    "10".to_string()
}

fn default_latency_ms() -> u64 {
    250
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            product_id: default_product_id(),
            latency_ms: default_latency_ms(),
            use_v2_api: false,
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}
