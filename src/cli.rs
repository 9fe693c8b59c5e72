use crate::application::commands::{self, AppState};
use crate::domain::models::{HttpMethod, Payload, ThemeColors};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vanda", version, about = "Talk to the Vanda spreadsheet backend")]
pub struct Cli {
    /// Store file to use instead of the one in the app data directory
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or change the endpoint and spreadsheet
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Check that the endpoint answers
    Test,
    /// Send any action
    Action {
        name: String,
        /// Send as POST with the payload in the body
        #[arg(long)]
        post: bool,
        /// JSON object
        #[arg(long)]
        payload: Option<String>,
    },
    #[command(subcommand)]
    Company(CompanyCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    Set { endpoint_url: String, dataset_id: String },
}

#[derive(Subcommand, Debug)]
pub enum CompanyCommand {
    /// Fetch from the spreadsheet
    Get,
    /// Last profile fetched or saved on this machine
    Cached,
    Save { profile: String },
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    Show,
    Set {
        #[arg(long)]
        primary: Option<String>,
        #[arg(long)]
        secondary: Option<String>,
        #[arg(long)]
        accent: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_payload(raw: Option<&str>) -> Result<Payload, String> {
    let Some(raw) = raw else {
        return Ok(Payload::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(_) => Err("Payload must be a JSON object".to_string()),
        Err(e) => Err(format!("Invalid payload JSON: {}", e)),
    }
}

fn pretty<T: Serialize>(state: &AppState, value: &T) -> Result<Option<String>, String> {
    serde_json::to_string_pretty(value)
        .map(Some)
        .map_err(|e| state.report(format!("Failed to format output: {}", e)))
}

fn payload_arg(state: &AppState, raw: Option<&str>) -> Result<Payload, String> {
    parse_payload(raw).map_err(|e| state.report(e))
}

/// Runs one command; the returned text is what the binary prints. Every
/// failure has already been shown through the notifier.
pub async fn dispatch(state: &AppState, command: Command) -> Result<Option<String>, String> {
    match command {
        Command::Config(ConfigCommand::Show) => pretty(state, &commands::load_settings(state)),
        Command::Config(ConfigCommand::Set {
            endpoint_url,
            dataset_id,
        }) => pretty(state, &commands::save_settings(state, &endpoint_url, &dataset_id)?),
        Command::Test => {
            let connected = commands::test_connection(state).await?;
            Ok(Some(connected.to_string()))
        }
        Command::Action {
            name,
            post,
            payload,
        } => {
            let payload = payload_arg(state, payload.as_deref())?;
            let method = if post { HttpMethod::Post } else { HttpMethod::Get };
            pretty(state, &commands::run_action(state, &name, payload, method).await?)
        }
        Command::Company(CompanyCommand::Get) => pretty(state, &commands::load_company(state).await?),
        Command::Company(CompanyCommand::Cached) => match state.company.cached() {
            Some(profile) => pretty(state, &profile),
            None => Ok(None),
        },
        Command::Company(CompanyCommand::Save { profile }) => {
            let profile = payload_arg(state, Some(&profile))?;
            commands::save_company(state, profile).await?;
            Ok(None)
        }
        Command::Theme(ThemeCommand::Show) => pretty(state, &commands::load_theme(state)),
        Command::Theme(ThemeCommand::Set {
            primary,
            secondary,
            accent,
        }) => {
            let current = commands::load_theme(state);
            let colors = ThemeColors {
                primary: primary.unwrap_or(current.primary),
                secondary: secondary.unwrap_or(current.secondary),
                accent: accent.unwrap_or(current.accent),
            };
            commands::save_theme(state, colors.clone())?;
            pretty(state, &colors)
        }
    }
}
