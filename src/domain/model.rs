use serde::{Deserialize, Serialize};

/// Standard vs FIFO, derived from the queue name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Standard,
    Fifo,
}

impl QueueKind {
    pub fn from_queue_name(queue_name: &str) -> Self {
        if queue_name.to_lowercase().ends_with(".fifo") {
            QueueKind::Fifo
        } else {
            QueueKind::Standard
        }
    }

    pub fn is_fifo(&self) -> bool {
        matches!(self, QueueKind::Fifo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub body: String,
    pub receipt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEntry {
    pub id: String,
    pub body: String,
    pub group_id: Option<String>,
    pub deduplication_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEntry {
    pub id: String,
    pub receipt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveRequest {
    pub max_messages: i32,
    pub visibility_timeout: i32,
    pub wait_time: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub id: String,
    pub code: String,
    pub message: Option<String>,
    pub sender_fault: bool,
}

/// Per-entry result of a batch call, keyed by entry id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub successful: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self, expected: usize) -> bool {
        self.failed.is_empty() && self.successful.len() == expected
    }
}
