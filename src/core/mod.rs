pub mod ids;
pub mod options;
pub mod sqs_utils;

pub use crate::domain::model::{
    BatchFailure, BatchOutcome, DeleteEntry, OutgoingEntry, QueueKind, ReceiveRequest,
    ReceivedMessage,
};
pub use crate::domain::ports::QueueClient;
pub use crate::utils::error::Result;
