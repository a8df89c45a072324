pub mod config;
pub mod core;
pub mod domain;
pub mod llm_bridge;
pub mod manifest;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::{Settings, TomlConfig};
pub use self::core::{catalog::CatalogBrowser, manifest_check::ManifestChecker};
pub use llm_bridge::{format_model_display, OpenRouterClient};
pub use manifest::{validate, Manifest, ValidationReport};
pub use utils::error::{PlaygroundError, Result};
