use clap::Parser;
use mcp_playground::config::Settings;
use mcp_playground::core::ConfigProvider;
use mcp_playground::manifest::IssueSeverity;
use mcp_playground::utils::error::{PlaygroundError, Result};
use mcp_playground::utils::logger;
use mcp_playground::{CatalogBrowser, CliConfig, Command, ManifestChecker, OpenRouterClient};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config.command);

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        if !matches!(e, PlaygroundError::ValidationError { .. }) {
            eprintln!("💡 {}", e.recovery_suggestion());
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(config: &CliConfig) -> Result<()> {
    let settings = config.resolve_settings()?;

    match &config.command {
        Command::Check { json, .. } => check_manifest(&settings, *json),
        Command::Models { provider, json, .. } => {
            list_models(&settings, provider.as_deref(), *json).await
        }
    }
}

fn check_manifest(settings: &Settings, json: bool) -> Result<()> {
    let checker = ManifestChecker::new(&settings.manifest_path).strict(settings.strict);
    let report = checker.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for issue in &report.issues {
            let label = match issue.severity() {
                IssueSeverity::Error => "error",
                IssueSeverity::Warning => "warning",
            };
            println!("{}: {}: {}", settings.manifest_path, label, issue);
        }
    }

    let report = checker.enforce(report)?;
    if !json {
        println!(
            "✅ {}: {} requirement(s), no conflicts",
            settings.manifest_path, report.requirement_count
        );
    }
    Ok(())
}

async fn list_models(settings: &Settings, provider: Option<&str>, json: bool) -> Result<()> {
    settings.require_api_key()?;

    let client = OpenRouterClient::from_config(settings)?;
    let browser =
        CatalogBrowser::new(client).with_tool_indicator(settings.include_tool_indicator());

    let models = match provider {
        Some(provider) => {
            browser
                .top_for_provider(provider, settings.default_limit())
                .await?
        }
        None => browser.list_all().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        for model in &models {
            println!("{}", model.display);
        }
    }

    tracing::info!("Listed {} model(s)", models.len());
    Ok(())
}
