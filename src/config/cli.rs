use crate::config::SqsSettings;
use crate::core::options::{ReceiveOptions, SendOptions};
use crate::utils::error::Result;
use crate::utils::validation::{validate_queue_name, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sqs-utils", version)]
#[command(about = "Send, receive and remove Amazon SQS messages by queue name")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML settings file (defaults to environment variables)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "AWS region override")]
    pub region: Option<String>,

    #[arg(long, global = true, help = "Custom SQS endpoint, e.g. http://localhost:4566")]
    pub endpoint_url: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Send messages (arguments, or one per stdin line)
    Send(SendArgs),
    /// Receive messages and print them as JSON lines
    Receive(ReceiveArgs),
    /// Remove messages by receipt handle
    Remove(RemoveArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SendArgs {
    #[arg(long)]
    pub queue: String,

    #[arg(long, help = "Message group id for FIFO queues")]
    pub group_id: Option<String>,

    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ReceiveArgs {
    #[arg(long)]
    pub queue: String,

    #[arg(long = "max", help = "Max number of messages to receive (1-10)")]
    pub max_batch_size: Option<u32>,

    #[arg(long = "hide-for", help = "Visibility timeout in seconds")]
    pub hide_for_seconds: Option<u32>,

    #[arg(long = "poll-for", help = "Long-poll wait time in seconds (0-20)")]
    pub poll_for_seconds: Option<u32>,

    #[arg(long, help = "Include receipt handles in the output")]
    pub with_receipt: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RemoveArgs {
    #[arg(long)]
    pub queue: String,

    #[arg(required = true)]
    pub receipts: Vec<String>,
}

impl CliConfig {
    /// Settings from `--config` (or the environment) with flag overrides applied.
    pub fn load_settings(&self) -> Result<SqsSettings> {
        let mut settings = match &self.config {
            Some(path) => SqsSettings::from_file(path)?,
            None => SqsSettings::from_env()?,
        };

        if let Some(region) = &self.region {
            settings.region = Some(region.clone());
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            settings.endpoint_url = Some(endpoint_url.clone());
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn queue(&self) -> &str {
        match &self.command {
            Command::Send(args) => &args.queue,
            Command::Receive(args) => &args.queue,
            Command::Remove(args) => &args.queue,
        }
    }
}

impl SendArgs {
    pub fn send_options(&self, settings: &SqsSettings) -> SendOptions {
        match &self.group_id {
            Some(group_id) => settings.send_options().with_group_id(group_id.clone()),
            None => settings.send_options(),
        }
    }
}

impl ReceiveArgs {
    pub fn receive_options(&self, settings: &SqsSettings) -> ReceiveOptions {
        let defaults = settings.receive_options();
        ReceiveOptions {
            hide_for_seconds: self.hide_for_seconds.unwrap_or(defaults.hide_for_seconds),
            poll_for_seconds: self.poll_for_seconds.unwrap_or(defaults.poll_for_seconds),
            max_batch_size: self.max_batch_size.unwrap_or(defaults.max_batch_size),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_queue_name(self.queue())
    }
}
