//! Interactive menu shown when gpush runs without a subcommand.

use std::path::Path;

use tracing::debug;

use crate::commands::{
    push, report_failure, set_api_key, set_model, set_provider, set_region, show_status,
};
use crate::config::Config;
use crate::error::GpushError;
use crate::llm::Provider;
use crate::ui::Interaction;
use crate::workflow::PushRequest;

const BACK: &str = "↩ Back";

const MAIN_MENU: [&str; 4] = ["Push changes", "Configure settings", "Show status", "Exit"];

const SETTINGS_MENU: [&str; 5] = ["OpenAI API Key", "AI Provider", "AI Model", "AWS Region", BACK];

const PROVIDER_CHOICES: [(Provider, &str); 2] = [
    (Provider::OpenAi, "OpenAI (GPT-4o)"),
    (Provider::Bedrock, "AWS Bedrock (Claude)"),
];

const OPENAI_MODEL_CHOICES: [(&str, &str); 2] = [
    ("gpt-4o", "GPT-4o (Most capable)"),
    ("gpt-3.5-turbo", "GPT-3.5 Turbo (Faster, cheaper)"),
];

const BEDROCK_MODEL_CHOICES: [(&str, &str); 2] = [
    (
        "anthropic.claude-3-5-sonnet-20240620-v1:0",
        "Claude 3.5 Sonnet (Recommended)",
    ),
    (
        "anthropic.claude-3-haiku-20240307-v1:0",
        "Claude 3 Haiku (Faster)",
    ),
];

const AWS_REGION_CHOICES: [(&str, &str); 4] = [
    ("us-east-1", "US East (N. Virginia)"),
    ("us-west-2", "US West (Oregon)"),
    ("eu-central-1", "EU (Frankfurt)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
];

/// Loop over the main menu until the user exits.
///
/// Errors from a menu action are reported and the loop continues. A
/// dismissed main menu ends the loop.
pub async fn run_menu(
    config: &mut Config,
    ui: &dyn Interaction,
    workdir: &Path,
) -> Result<(), GpushError> {
    if !ui.is_interactive() {
        ui.report_error("The interactive menu needs a terminal. Run `gpush --help` for commands.");
        return Err(GpushError::Cancelled);
    }

    loop {
        let choice = match ui.select("What would you like to do?", &labels(&MAIN_MENU)) {
            Ok(choice) => choice,
            Err(GpushError::Cancelled) => return Ok(()),
            Err(e) => return Err(e),
        };

        let result = match choice {
            0 => push(config, ui, workdir, &PushRequest::default())
                .await
                .map(|_| ()),
            1 => configure_settings(config, ui),
            2 => {
                show_status(config, ui);
                Ok(())
            }
            _ => return Ok(()),
        };

        if let Err(e) = result {
            debug!("Menu action failed: {e:?}");
            report_failure(ui, &e);
        }
    }
}

/// One pass through the settings submenu.
fn configure_settings(config: &mut Config, ui: &dyn Interaction) -> Result<(), GpushError> {
    let choice = ui.select(
        "Which setting would you like to configure?",
        &labels(&SETTINGS_MENU),
    )?;

    match choice {
        0 => {
            let key = ui.prompt_secret("Enter your OpenAI API Key")?;
            set_api_key(config, ui, &key)
        }
        1 => {
            let items = with_back(PROVIDER_CHOICES.iter().map(|(_, label)| *label));
            let picked = ui.select("Select AI Provider:", &items)?;
            match PROVIDER_CHOICES.get(picked) {
                Some((provider, _)) => set_provider(config, ui, provider.id()),
                None => Ok(()),
            }
        }
        2 => {
            let choices: &[(&str, &str)] = match config.provider()? {
                Provider::OpenAi => &OPENAI_MODEL_CHOICES,
                Provider::Bedrock => &BEDROCK_MODEL_CHOICES,
            };
            pick_value(ui, "Select AI Model:", choices)?
                .map_or(Ok(()), |model| set_model(config, ui, model))
        }
        3 => pick_value(ui, "Select AWS Region:", &AWS_REGION_CHOICES)?
            .map_or(Ok(()), |region| set_region(config, ui, region)),
        _ => Ok(()),
    }
}

/// Select one of `choices`, or `None` when the user picks Back.
fn pick_value(
    ui: &dyn Interaction,
    prompt: &str,
    choices: &[(&'static str, &'static str)],
) -> Result<Option<&'static str>, GpushError> {
    let items = with_back(choices.iter().map(|(_, label)| *label));
    let picked = ui.select(prompt, &items)?;
    Ok(choices.get(picked).map(|(value, _)| *value))
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn with_back<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items.map(String::from).chain([BACK.to_string()]).collect()
}
