use crate::utils::error::{PlaygroundError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub openrouter: Option<OpenRouterConfig>,
    pub manifest: Option<ManifestConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestConfig {
    pub path: Option<String>,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub include_tool_indicator: Option<bool>,
    pub default_limit: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlaygroundError::IoError)?;
        tracing::debug!("Loaded config file {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PlaygroundError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENROUTER_API_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(openrouter) = &self.openrouter {
            if let Some(base_url) = &openrouter.base_url {
                crate::utils::validation::validate_url("openrouter.base_url", base_url)?;
            }
            if let Some(site_url) = &openrouter.site_url {
                crate::utils::validation::validate_url("openrouter.site_url", site_url)?;
            }
            if let Some(timeout) = openrouter.timeout_seconds {
                crate::utils::validation::validate_positive_number(
                    "openrouter.timeout_seconds",
                    timeout as usize,
                    1,
                )?;
            }
        }

        if let Some(manifest) = &self.manifest {
            if let Some(path) = &manifest.path {
                crate::utils::validation::validate_path("manifest.path", path)?;
            }
        }

        if let Some(limit) = self.display.as_ref().and_then(|d| d.default_limit) {
            crate::utils::validation::validate_positive_number("display.default_limit", limit, 1)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[openrouter]
api_key = "sk-or-abc"
base_url = "https://openrouter.ai/api/v1"
site_name = "MCP Playground"
timeout_seconds = 10

[manifest]
path = "requirements.txt"
strict = true

[display]
include_tool_indicator = true
default_limit = 3
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let openrouter = config.openrouter.as_ref().unwrap();
        assert_eq!(openrouter.api_key.as_deref(), Some("sk-or-abc"));
        assert_eq!(openrouter.timeout_seconds, Some(10));
        assert_eq!(config.manifest.as_ref().unwrap().strict, Some(true));
        assert_eq!(config.display.as_ref().unwrap().default_limit, Some(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.openrouter.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MCP_PLAYGROUND_TEST_KEY", "sk-or-from-env");

        let toml_content = r#"
[openrouter]
api_key = "${MCP_PLAYGROUND_TEST_KEY}"
site_name = "${MCP_PLAYGROUND_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let openrouter = config.openrouter.unwrap();
        assert_eq!(openrouter.api_key.as_deref(), Some("sk-or-from-env"));
        assert_eq!(
            openrouter.site_name.as_deref(),
            Some("${MCP_PLAYGROUND_UNSET_VAR}")
        );

        std::env::remove_var("MCP_PLAYGROUND_TEST_KEY");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[openrouter]
base_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[display]\ndefault_limit = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[openrouter\napi_key = 1").unwrap_err();
        assert!(matches!(err, PlaygroundError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[manifest]\npath = \"deps/requirements.txt\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.manifest.unwrap().path.as_deref(),
            Some("deps/requirements.txt")
        );
    }
}
