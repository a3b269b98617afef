//! Command handlers behind the CLI subcommands.
//!
//! Each handler takes the configuration loaded once in `main` and the
//! interaction capability, so none of them touch the terminal directly.

pub mod menu;

use std::path::Path;

use tracing::debug;

use crate::config::{Config, ConfigKey, mask_secret, validate_api_key};
use crate::error::{ConfigError, GpushError};
use crate::git::SystemGit;
use crate::llm::{Provider, build_provider};
use crate::ui::Interaction;
use crate::workflow::{Limits, PushOutcome, PushRequest, run_push};

pub use menu::run_menu;

/// Attempts allowed for the first-run API key prompt.
const API_KEY_ATTEMPTS: usize = 3;

const SET_KEY_HINT: &str = "Use `gpush config --set-key <key>`";

/// Flags accepted by `gpush config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub set_key: Option<String>,
    pub show_key: bool,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub region: Option<String>,
    pub set_bedrock_key: Option<String>,
}

impl ConfigArgs {
    fn is_empty(&self) -> bool {
        self.set_key.is_none()
            && !self.show_key
            && self.provider.is_none()
            && self.model.is_none()
            && self.region.is_none()
            && self.set_bedrock_key.is_none()
    }
}

/// `gpush push`: generate, confirm, commit and push in the repository at `workdir`.
pub async fn push(
    config: &mut Config,
    ui: &dyn Interaction,
    workdir: &Path,
    request: &PushRequest,
) -> Result<PushOutcome, GpushError> {
    ensure_api_key(config, ui)?;

    let git = SystemGit::discover(workdir)?;
    debug!("Repository at {}", git.workdir().display());

    let provider = build_provider(config)?;
    run_push(
        &git,
        provider.as_ref(),
        ui,
        request,
        Limits::from_config(config),
    )
    .await
}

/// Prompt for an OpenAI API key when the OpenAI provider is selected and no
/// key is stored yet.
pub fn ensure_api_key(config: &mut Config, ui: &dyn Interaction) -> Result<(), GpushError> {
    if config.provider()? != Provider::OpenAi || config.is_set(ConfigKey::OpenAiApiKey) {
        return Ok(());
    }

    if !ui.is_interactive() {
        return Err(ConfigError::NotInteractive(SET_KEY_HINT).into());
    }

    ui.report("No API key configured. Please enter your OpenAI API key:");
    for attempt in 1..=API_KEY_ATTEMPTS {
        let key = ui.prompt_secret("OpenAI API Key")?;
        let key = key.trim();
        match validate_api_key(key) {
            Ok(()) => {
                config.set(ConfigKey::OpenAiApiKey, key)?;
                ui.report("API key successfully stored");
                return Ok(());
            }
            Err(e) if attempt < API_KEY_ATTEMPTS => ui.report_error(&e.to_string()),
            Err(e) => return Err(e.into()),
        }
    }

    Err(ConfigError::InvalidApiKey.into())
}

/// `gpush config`. With no flags, shows the current status.
pub fn configure(
    config: &mut Config,
    ui: &dyn Interaction,
    args: &ConfigArgs,
) -> Result<(), GpushError> {
    if args.is_empty() {
        show_status(config, ui);
        return Ok(());
    }

    // Validate every flag before anything is written.
    let provider = args
        .provider
        .as_deref()
        .map(str::parse::<Provider>)
        .transpose()?;
    let model = args
        .model
        .as_deref()
        .map(|model| non_empty(model, "Model"))
        .transpose()?;
    // A model given alongside a provider lands on the new provider.
    let model_provider = match (model, provider) {
        (None, _) => None,
        (Some(_), Some(provider)) => Some(provider),
        (Some(_), None) => Some(config.provider()?),
    };
    let region = args
        .region
        .as_deref()
        .map(|region| non_empty(region, "AWS region"))
        .transpose()?;
    let api_key = args.set_key.as_deref().map(checked_api_key).transpose()?;
    let bedrock_key = args
        .set_bedrock_key
        .as_deref()
        .map(|key| non_empty(key, "Bedrock API key"))
        .transpose()?;

    if let Some(provider) = provider {
        store_provider(config, ui, provider)?;
    }
    if let (Some(model), Some(provider)) = (model, model_provider) {
        store_model(config, ui, provider, model)?;
    }
    if let Some(region) = region {
        store_region(config, ui, region)?;
    }
    if let Some(key) = api_key {
        store_api_key(config, ui, key)?;
    }
    if let Some(key) = bedrock_key {
        store_bedrock_key(config, ui, key)?;
    }
    if args.show_key {
        let key = config.get(ConfigKey::OpenAiApiKey);
        ui.report(&format!("API key: {}", mask_secret(key.as_deref())));
    }

    Ok(())
}

/// Validate and store the OpenAI API key.
pub fn set_api_key(config: &mut Config, ui: &dyn Interaction, key: &str) -> Result<(), GpushError> {
    let key = checked_api_key(key)?;
    store_api_key(config, ui, key)
}

/// Store the Bedrock API key.
pub fn set_bedrock_key(
    config: &mut Config,
    ui: &dyn Interaction,
    key: &str,
) -> Result<(), GpushError> {
    let key = non_empty(key, "Bedrock API key")?;
    store_bedrock_key(config, ui, key)
}

/// `gpush ai:provider <provider>`.
pub fn set_provider(
    config: &mut Config,
    ui: &dyn Interaction,
    provider: &str,
) -> Result<(), GpushError> {
    let provider: Provider = provider.parse()?;
    store_provider(config, ui, provider)
}

/// `gpush ai:model <model>`: sets the model of the selected provider.
pub fn set_model(config: &mut Config, ui: &dyn Interaction, model: &str) -> Result<(), GpushError> {
    let model = non_empty(model, "Model")?;
    let provider = config.provider()?;
    store_model(config, ui, provider, model)
}

/// `gpush ai:region <region>`.
pub fn set_region(config: &mut Config, ui: &dyn Interaction, region: &str) -> Result<(), GpushError> {
    let region = non_empty(region, "AWS region")?;
    store_region(config, ui, region)
}

/// Report a failed command through `ui` and return its process exit code.
pub fn report_failure(ui: &dyn Interaction, err: &GpushError) -> i32 {
    let code = err.exit_code();
    ui.report_error(&format!("Error ({code}): {err}"));
    code
}

fn store_api_key(config: &mut Config, ui: &dyn Interaction, key: &str) -> Result<(), GpushError> {
    config.set(ConfigKey::OpenAiApiKey, key)?;
    ui.report("API key successfully stored");
    Ok(())
}

fn store_bedrock_key(
    config: &mut Config,
    ui: &dyn Interaction,
    key: &str,
) -> Result<(), GpushError> {
    config.set(ConfigKey::BedrockApiKey, key)?;
    ui.report("Bedrock API key successfully stored");
    Ok(())
}

fn store_provider(
    config: &mut Config,
    ui: &dyn Interaction,
    provider: Provider,
) -> Result<(), GpushError> {
    config.set(ConfigKey::Provider, provider.id())?;
    ui.report(&format!("AI provider set to: {provider}"));
    Ok(())
}

fn store_model(
    config: &mut Config,
    ui: &dyn Interaction,
    provider: Provider,
    model: &str,
) -> Result<(), GpushError> {
    let key = match provider {
        Provider::OpenAi => ConfigKey::OpenAiModel,
        Provider::Bedrock => ConfigKey::BedrockModel,
    };
    config.set(key, model)?;
    ui.report(&format!("Default AI model set to: {model}"));
    Ok(())
}

fn store_region(config: &mut Config, ui: &dyn Interaction, region: &str) -> Result<(), GpushError> {
    config.set(ConfigKey::AwsRegion, region)?;
    ui.report(&format!("AWS region set to: {region}"));
    Ok(())
}

/// `gpush status`.
pub fn show_status(config: &Config, ui: &dyn Interaction) {
    for line in status_lines(config) {
        ui.report(&line);
    }
}

/// Lines describing the current configuration. Secrets are masked.
pub fn status_lines(config: &Config) -> Vec<String> {
    const RULE: &str = "--------------------";

    let mut lines = vec![
        String::new(),
        "Current Configuration:".to_string(),
        RULE.to_string(),
    ];

    match config.provider() {
        Ok(Provider::OpenAi) => {
            let key = config.get(ConfigKey::OpenAiApiKey);
            lines.push(format!("AI Provider: {}", Provider::OpenAi.id()));
            lines.push(format!("OpenAI API Key: {}", mask_secret(key.as_deref())));
            lines.push(format!("OpenAI Model: {}", config.openai_model()));
        }
        Ok(Provider::Bedrock) => {
            let key = config.bedrock_api_key().ok();
            lines.push(format!("AI Provider: {}", Provider::Bedrock.id()));
            lines.push(format!("AWS Region: {}", config.aws_region()));
            lines.push(format!("Bedrock Model: {}", config.bedrock_model()));
            lines.push(format!("Bedrock API Key: {}", mask_secret(key.as_deref())));
        }
        Err(_) => {
            let raw = config.get(ConfigKey::Provider).unwrap_or_default();
            lines.push(format!("AI Provider: {raw} (unsupported)"));
        }
    }

    lines.push(RULE.to_string());
    lines.push(String::new());
    lines
}

fn checked_api_key(key: &str) -> Result<&str, ConfigError> {
    let key = key.trim();
    validate_api_key(key)?;
    Ok(key)
}

fn non_empty<'a>(value: &'a str, label: &'static str) -> Result<&'a str, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::EmptyValue(label))
    } else {
        Ok(value)
    }
}
