//! Configuration loaded from TOML.
//!
//! Every section and field has a default, so a missing or partial file is
//! valid. Sections are handed explicitly to the part that uses them:
//! [`EngineConfig`] to the dispatcher, [`HarnessConfig`] to the test
//! harness, [`DemoConfig`] to the demo providers.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, DemoConfig, EngineConfig, HarnessConfig};
