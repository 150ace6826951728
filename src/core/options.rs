use crate::core::ids::{default_id_fn, IdFn};
use crate::domain::model::ReceiveRequest;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_GROUP_ID: &str = "default";
pub const DEFAULT_HIDE_FOR_SECONDS: u32 = 60 * 60;
pub const DEFAULT_POLL_FOR_SECONDS: u32 = 20;
pub const DEFAULT_MAX_BATCH_SIZE: u32 = 10;

/// SQS accepts at most ten entries per batch request.
pub const MAX_BATCH_ENTRIES: usize = 10;
pub const MAX_HIDE_FOR_SECONDS: u32 = 12 * 60 * 60;
pub const MAX_POLL_FOR_SECONDS: u32 = 20;

/// How outgoing messages are tagged.
///
/// `group_id` and the deduplication id are only attached for FIFO queues;
/// the entry id is always attached and must be unique within one request.
#[derive(Clone)]
pub struct SendOptions {
    pub group_id: String,
    identify: IdFn,
    deduplicate: IdFn,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn with_identify<F>(mut self, identify: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        self.identify = Arc::new(identify);
        self
    }

    pub fn with_deduplicate<F>(mut self, deduplicate: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        self.deduplicate = Arc::new(deduplicate);
        self
    }

    pub fn identify(&self, body: &str) -> String {
        (self.identify)(body.as_bytes())
    }

    pub fn deduplicate(&self, body: &str) -> String {
        (self.deduplicate)(body.as_bytes())
    }
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            group_id: DEFAULT_GROUP_ID.to_string(),
            identify: default_id_fn(),
            deduplicate: default_id_fn(),
        }
    }
}

impl fmt::Debug for SendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendOptions")
            .field("group_id", &self.group_id)
            .finish_non_exhaustive()
    }
}

impl Validate for SendOptions {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("group_id", &self.group_id)
    }
}

/// Receive parameters.
///
/// * `hide_for_seconds` - visibility timeout, how long a received message stays
///   hidden from subsequent receives
/// * `poll_for_seconds` - long-poll wait time when the queue is empty
/// * `max_batch_size` - upper bound on messages returned by one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveOptions {
    pub hide_for_seconds: u32,
    pub poll_for_seconds: u32,
    pub max_batch_size: u32,
}

impl ReceiveOptions {
    pub fn with_hide_for_seconds(mut self, seconds: u32) -> Self {
        self.hide_for_seconds = seconds;
        self
    }

    pub fn with_poll_for_seconds(mut self, seconds: u32) -> Self {
        self.poll_for_seconds = seconds;
        self
    }

    pub fn with_max_batch_size(mut self, size: u32) -> Self {
        self.max_batch_size = size;
        self
    }

    pub(crate) fn to_request(self) -> Result<ReceiveRequest> {
        self.validate()?;
        // 範圍已驗證，轉型不會溢位
        Ok(ReceiveRequest {
            max_messages: self.max_batch_size as i32,
            visibility_timeout: self.hide_for_seconds as i32,
            wait_time: self.poll_for_seconds as i32,
        })
    }
}

impl Default for ReceiveOptions {
    fn default() -> Self {
        Self {
            hide_for_seconds: DEFAULT_HIDE_FOR_SECONDS,
            poll_for_seconds: DEFAULT_POLL_FOR_SECONDS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl Validate for ReceiveOptions {
    fn validate(&self) -> Result<()> {
        validate_range(
            "max_batch_size",
            self.max_batch_size,
            1,
            MAX_BATCH_ENTRIES as u32,
        )?;
        validate_range("poll_for_seconds", self.poll_for_seconds, 0, MAX_POLL_FOR_SECONDS)?;
        validate_range("hide_for_seconds", self.hide_for_seconds, 0, MAX_HIDE_FOR_SECONDS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_defaults() {
        let options = ReceiveOptions::default();
        assert_eq!(options.hide_for_seconds, 3600);
        assert_eq!(options.poll_for_seconds, 20);
        assert_eq!(options.max_batch_size, 10);

        let request = options.to_request().unwrap();
        assert_eq!(request.max_messages, 10);
        assert_eq!(request.visibility_timeout, 3600);
        assert_eq!(request.wait_time, 20);
    }

    #[test]
    fn test_receive_limits() {
        assert!(ReceiveOptions::default().with_max_batch_size(0).validate().is_err());
        assert!(ReceiveOptions::default().with_max_batch_size(11).validate().is_err());
        assert!(ReceiveOptions::default().with_poll_for_seconds(21).validate().is_err());
        assert!(ReceiveOptions::default().with_hide_for_seconds(43_201).validate().is_err());
        assert!(ReceiveOptions::default()
            .with_hide_for_seconds(0)
            .with_poll_for_seconds(0)
            .with_max_batch_size(1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_send_options_custom_ids() {
        let options = SendOptions::new()
            .with_group_id("orders")
            .with_identify(|body| format!("id-{}", body.len()))
            .with_deduplicate(|_| "same".to_string());

        assert_eq!(options.group_id, "orders");
        assert_eq!(options.identify("abc"), "id-3");
        assert_eq!(options.deduplicate("abc"), "same");
    }

    #[test]
    fn test_send_options_reject_blank_group() {
        assert!(SendOptions::new().with_group_id("  ").validate().is_err());
        assert!(SendOptions::default().validate().is_ok());
    }
}
