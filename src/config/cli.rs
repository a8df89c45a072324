use crate::config::settings::{Settings, API_KEY_ENV};
use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mcp-playground")]
#[command(about = "Check dependency manifests and browse OpenRouter models")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse a dependency manifest and report conflicting constraints
    Check {
        /// Manifest to check (defaults to manifest.path or requirements.txt)
        path: Option<String>,

        #[arg(long, help = "Treat duplicate requirements as errors")]
        strict: bool,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },

    /// List OpenRouter models, optionally the top N for one provider
    Models {
        #[arg(long, help = "Provider prefix such as openai, anthropic or google")]
        provider: Option<String>,

        #[arg(long, requires = "provider", help = "Number of models to show for --provider")]
        limit: Option<usize>,

        #[arg(long, help = "Mark models that support tool calling")]
        tools: bool,

        #[arg(long, help = "Print models as JSON")]
        json: bool,

        #[arg(long, help = "OpenRouter API key (falls back to OPENROUTER_API_KEY)")]
        api_key: Option<String>,

        #[arg(long)]
        base_url: Option<String>,
    },
}

impl CliConfig {
    /// TOML 設定為底，命令列參數優先；API 金鑰最後才看環境變數
    pub fn resolve_settings(&self) -> Result<Settings> {
        let toml_config = match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                config
            }
            None => TomlConfig::default(),
        };

        let mut settings = Settings::from_toml(&toml_config);

        match &self.command {
            Command::Check { path, strict, .. } => {
                if let Some(path) = path {
                    settings.manifest_path = path.clone();
                }
                settings.strict |= *strict;
            }
            Command::Models {
                limit,
                tools,
                api_key,
                base_url,
                ..
            } => {
                if let Some(key) = api_key {
                    settings.api_key = Some(key.clone());
                }
                if let Some(url) = base_url {
                    settings.base_url = url.clone();
                }
                if let Some(limit) = limit {
                    settings.default_limit = *limit;
                }
                settings.include_tool_indicator |= *tools;
            }
        }
        settings.fill_api_key_from(std::env::var(API_KEY_ENV).ok());

        settings.validate()?;
        Ok(settings)
    }
}
