use crate::core::ids::sha256_hex;
use crate::core::options::{ReceiveOptions, SendOptions, MAX_BATCH_ENTRIES};
use crate::domain::model::{DeleteEntry, OutgoingEntry, QueueKind, ReceivedMessage};
use crate::domain::ports::QueueClient;
use crate::utils::error::{Result, SqsError};
use crate::utils::validation::{validate_queue_name, Validate};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Queue-name based helpers on top of a [`QueueClient`].
pub struct SqsUtils<C: QueueClient> {
    client: C,
    queue_urls: RwLock<HashMap<String, String>>,
}

impl<C: QueueClient> SqsUtils<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            queue_urls: RwLock::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Sends a batch of messages to a queue.
    ///
    /// Messages go out in order, at most ten per request. For FIFO queues
    /// every entry carries the group id and a deduplication id, and sending
    /// stops at the first request with failures so that later messages never
    /// overtake earlier ones. Returns `true` if the entire batch was sent.
    pub async fn send_batch<S: AsRef<str>>(
        &self,
        batch: &[S],
        queue_name: &str,
        options: &SendOptions,
    ) -> Result<bool> {
        if batch.is_empty() {
            return Ok(true);
        }

        options.validate()?;
        let kind = QueueKind::from_queue_name(queue_name);

        // 先建立所有分批，重複 id 在送出任何請求前就回報
        let chunks = batch
            .chunks(MAX_BATCH_ENTRIES)
            .map(|chunk| build_outgoing_entries(chunk, kind, options))
            .collect::<Result<Vec<_>>>()?;

        let queue_url = self.resolve_queue_url(queue_name).await?;
        let mut sent = 0usize;
        let mut successful = true;

        for entries in chunks {
            let expected = entries.len();
            tracing::debug!("Sending {} messages to {}", expected, queue_name);
            let outcome = self.client.send_entries(&queue_url, entries).await?;
            sent += outcome.successful.len();

            for failure in &outcome.failed {
                tracing::warn!(
                    "Message {} was not sent to {}: {} {}",
                    failure.id,
                    queue_name,
                    failure.code,
                    failure.message.as_deref().unwrap_or("")
                );
            }

            if !outcome.all_succeeded(expected) {
                successful = false;
                if kind.is_fifo() {
                    tracing::warn!(
                        "Stopping FIFO send to {} after a partial failure",
                        queue_name
                    );
                    break;
                }
            }
        }

        tracing::info!("Sent {}/{} messages to {}", sent, batch.len(), queue_name);
        Ok(successful)
    }

    /// Receives a single message body, or `None` if the queue stayed empty
    /// for the whole poll.
    pub async fn receive_one(
        &self,
        queue_name: &str,
        options: ReceiveOptions,
    ) -> Result<Option<String>> {
        let batch = self
            .receive_many(queue_name, options.with_max_batch_size(1))
            .await?;
        Ok(batch.into_iter().next())
    }

    /// Receives up to `max_batch_size` message bodies.
    pub async fn receive_many(
        &self,
        queue_name: &str,
        options: ReceiveOptions,
    ) -> Result<Vec<String>> {
        let messages = self
            .receive_many_with_receipts(queue_name, options)
            .await?;
        Ok(messages.into_iter().map(|message| message.body).collect())
    }

    /// Receives up to `max_batch_size` messages together with the receipt
    /// handles needed to remove them.
    pub async fn receive_many_with_receipts(
        &self,
        queue_name: &str,
        options: ReceiveOptions,
    ) -> Result<Vec<ReceivedMessage>> {
        let request = options.to_request()?;
        let queue_url = self.resolve_queue_url(queue_name).await?;

        let messages = self.client.receive(&queue_url, &request).await?;
        tracing::debug!("Received {} messages from {}", messages.len(), queue_name);
        Ok(messages)
    }

    /// Removes messages by receipt handle. Returns `true` if all of them
    /// were removed; an invalid receipt handle yields `false`.
    pub async fn remove_batch<S: AsRef<str>>(
        &self,
        queue_name: &str,
        receipts: &[S],
    ) -> Result<bool> {
        if receipts.is_empty() {
            return Ok(true);
        }

        let chunks = receipts
            .chunks(MAX_BATCH_ENTRIES)
            .map(build_delete_entries)
            .collect::<Result<Vec<_>>>()?;

        let queue_url = self.resolve_queue_url(queue_name).await?;
        let mut removed = true;

        for entries in chunks {
            let expected = entries.len();
            match self.client.delete_entries(&queue_url, entries).await {
                Ok(outcome) => {
                    for failure in &outcome.failed {
                        tracing::warn!(
                            "Receipt {} was not removed from {}: {}",
                            failure.id,
                            queue_name,
                            failure.code
                        );
                    }
                    if !outcome.all_succeeded(expected) {
                        removed = false;
                    }
                }
                Err(SqsError::ReceiptHandleInvalid { message }) => {
                    tracing::warn!("Invalid receipt handle for {}: {}", queue_name, message);
                    removed = false;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(removed)
    }

    async fn resolve_queue_url(&self, queue_name: &str) -> Result<String> {
        validate_queue_name(queue_name)?;

        if let Ok(cache) = self.queue_urls.read() {
            if let Some(url) = cache.get(queue_name) {
                return Ok(url.clone());
            }
        }

        let url = self.client.queue_url(queue_name).await?;
        tracing::debug!("Resolved queue {} to {}", queue_name, url);

        if let Ok(mut cache) = self.queue_urls.write() {
            cache.insert(queue_name.to_string(), url.clone());
        }
        Ok(url)
    }
}

fn build_outgoing_entries<S: AsRef<str>>(
    chunk: &[S],
    kind: QueueKind,
    options: &SendOptions,
) -> Result<Vec<OutgoingEntry>> {
    let entries = chunk
        .iter()
        .map(|message| {
            let body = message.as_ref();
            let (group_id, deduplication_id) = match kind {
                QueueKind::Fifo => (
                    Some(options.group_id.clone()),
                    Some(options.deduplicate(body)),
                ),
                QueueKind::Standard => (None, None),
            };
            OutgoingEntry {
                id: options.identify(body),
                body: body.to_string(),
                group_id,
                deduplication_id,
            }
        })
        .collect::<Vec<_>>();

    ensure_distinct_ids(entries.iter().map(|entry| entry.id.as_str()))?;
    Ok(entries)
}

fn build_delete_entries<S: AsRef<str>>(chunk: &[S]) -> Result<Vec<DeleteEntry>> {
    let entries = chunk
        .iter()
        .map(|receipt| DeleteEntry {
            id: sha256_hex(receipt.as_ref().as_bytes()),
            receipt: receipt.as_ref().to_string(),
        })
        .collect::<Vec<_>>();

    ensure_distinct_ids(entries.iter().map(|entry| entry.id.as_str()))?;
    Ok(entries)
}

fn ensure_distinct_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SqsError::DuplicateEntryId { id: id.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_entries_have_no_fifo_fields() {
        let entries =
            build_outgoing_entries(&["a", "b"], QueueKind::Standard, &SendOptions::default())
                .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|e| e.group_id.is_none() && e.deduplication_id.is_none()));
        assert_eq!(entries[0].id, sha256_hex(b"a"));
    }

    #[test]
    fn test_fifo_entries_carry_group_and_dedup_ids() {
        let options = SendOptions::new().with_group_id("g1");
        let entries = build_outgoing_entries(&["a"], QueueKind::Fifo, &options).unwrap();
        assert_eq!(entries[0].group_id.as_deref(), Some("g1"));
        assert_eq!(entries[0].deduplication_id, Some(sha256_hex(b"a")));
    }

    #[test]
    fn test_duplicate_bodies_are_rejected() {
        let result = build_outgoing_entries(&["same", "same"], QueueKind::Standard, &SendOptions::default());
        assert!(matches!(result, Err(SqsError::DuplicateEntryId { .. })));
    }

    #[test]
    fn test_delete_entries_are_keyed_by_receipt_hash() {
        let entries = build_delete_entries(&["r1", "r2"]).unwrap();
        assert_eq!(entries[1].id, sha256_hex(b"r2"));
        assert_eq!(entries[1].receipt, "r2");
    }
}
