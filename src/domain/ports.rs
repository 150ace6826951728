use crate::domain::model::{BatchOutcome, DeleteEntry, OutgoingEntry, ReceiveRequest, ReceivedMessage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Low-level queue operations addressed by queue URL.
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn queue_url(&self, queue_name: &str) -> Result<String>;

    async fn send_entries(&self, queue_url: &str, entries: Vec<OutgoingEntry>)
        -> Result<BatchOutcome>;

    async fn receive(&self, queue_url: &str, request: &ReceiveRequest)
        -> Result<Vec<ReceivedMessage>>;

    async fn delete_entries(&self, queue_url: &str, entries: Vec<DeleteEntry>)
        -> Result<BatchOutcome>;
}
