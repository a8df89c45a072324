use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::llm_bridge::DEFAULT_BASE_URL;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};

pub const DEFAULT_MANIFEST_PATH: &str = "requirements.txt";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_LIMIT: usize = 5;
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// 合併 TOML 檔與命令列參數之後的最終設定
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    pub timeout_seconds: u64,
    pub manifest_path: String,
    pub strict: bool,
    pub include_tool_indicator: bool,
    pub default_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            site_url: None,
            site_name: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            strict: false,
            include_tool_indicator: false,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut settings = Settings::default();

        if let Some(openrouter) = &config.openrouter {
            settings.api_key = openrouter.api_key.clone().and_then(resolved);
            settings.site_url = openrouter.site_url.clone().and_then(resolved);
            settings.site_name = openrouter.site_name.clone().and_then(resolved);
            if let Some(base_url) = &openrouter.base_url {
                settings.base_url = base_url.clone();
            }
            if let Some(timeout) = openrouter.timeout_seconds {
                settings.timeout_seconds = timeout;
            }
        }

        if let Some(manifest) = &config.manifest {
            if let Some(path) = &manifest.path {
                settings.manifest_path = path.clone();
            }
            settings.strict = manifest.strict.unwrap_or(false);
        }

        if let Some(display) = &config.display {
            settings.include_tool_indicator = display.include_tool_indicator.unwrap_or(false);
            if let Some(limit) = display.default_limit {
                settings.default_limit = limit;
            }
        }

        settings
    }

    /// 只有呼叫 OpenRouter 的命令才需要 API 金鑰
    /// 只有在旗標與設定檔都沒有給金鑰時才採用 `fallback`
    pub fn fill_api_key_from(&mut self, fallback: Option<String>) {
        if self.api_key.is_none() {
            self.api_key = fallback.and_then(resolved);
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        let key = validate_required_field("openrouter.api_key", &self.api_key)?;
        validate_non_empty_string("openrouter.api_key", key)?;
        Ok(key)
    }
}

// 未被替換的 `${VAR}` 視為沒有設定
fn resolved(value: String) -> Option<String> {
    if value.trim().is_empty() || (value.starts_with("${") && value.ends_with('}')) {
        tracing::debug!("Ignoring unresolved config value {}", value);
        None
    } else {
        Some(value)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("openrouter.base_url", &self.base_url)?;
        if let Some(site_url) = &self.site_url {
            validate_url("openrouter.site_url", site_url)?;
        }
        validate_positive_number("openrouter.timeout_seconds", self.timeout_seconds as usize, 1)?;
        validate_path("manifest.path", &self.manifest_path)?;
        validate_positive_number("display.default_limit", self.default_limit, 1)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref()
    }

    fn site_name(&self) -> Option<&str> {
        self.site_name.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn include_tool_indicator(&self) -> bool {
        self.include_tool_indicator
    }

    fn default_limit(&self) -> usize {
        self.default_limit
    }
}
