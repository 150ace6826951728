pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::AwsSqsClient;
pub use config::SqsSettings;
pub use crate::core::{
    options::{ReceiveOptions, SendOptions},
    sqs_utils::SqsUtils,
    QueueClient, ReceivedMessage,
};
pub use utils::error::{Result, SqsError};
