use crate::config::SqsSettings;
use crate::core::sqs_utils::SqsUtils;
use crate::domain::model::{
    BatchFailure, BatchOutcome, DeleteEntry, OutgoingEntry, ReceiveRequest, ReceivedMessage,
};
use crate::domain::ports::QueueClient;
use crate::utils::error::{Result, SqsError};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::config::Region;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::{
    BatchResultErrorEntry, DeleteMessageBatchRequestEntry, SendMessageBatchRequestEntry,
};
use aws_sdk_sqs::Client as AwsClient;

const RECEIPT_HANDLE_IS_INVALID: &str = "ReceiptHandleIsInvalid";
const NON_EXISTENT_QUEUE: &str = "AWS.SimpleQueueService.NonExistentQueue";
const QUEUE_DOES_NOT_EXIST: &str = "QueueDoesNotExist";

#[derive(Debug, Clone)]
pub struct AwsSqsClient {
    client: AwsClient,
}

impl AwsSqsClient {
    pub fn new(client: AwsClient) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS provider chain, applying the
    /// region and endpoint overrides in `settings`.
    pub async fn from_settings(settings: &SqsSettings) -> Result<Self> {
        settings.validate()?;

        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_sqs::config::Builder::from(&shared);

        if let Some(region) = &settings.region {
            builder = builder.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &settings.endpoint_url {
            tracing::debug!("Using custom SQS endpoint {}", endpoint_url);
            builder = builder.endpoint_url(endpoint_url);
        }

        Ok(Self::new(AwsClient::from_conf(builder.build())))
    }
}

impl SqsUtils<AwsSqsClient> {
    pub async fn from_settings(settings: &SqsSettings) -> Result<Self> {
        Ok(Self::new(AwsSqsClient::from_settings(settings).await?))
    }

    pub async fn from_env() -> Result<Self> {
        Self::from_settings(&SqsSettings::from_env()?).await
    }
}

#[async_trait]
impl QueueClient for AwsSqsClient {
    async fn queue_url(&self, queue_name: &str) -> Result<String> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|err| {
                let missing = err
                    .as_service_error()
                    .map(|e| {
                        // 只有 x-amzn-query-error 標頭時才會解析成具型別的變體
                        e.is_queue_does_not_exist()
                            || matches!(
                                e.code(),
                                Some(NON_EXISTENT_QUEUE) | Some(QUEUE_DOES_NOT_EXIST)
                            )
                    })
                    .unwrap_or(false);
                if missing {
                    SqsError::QueueNotFound {
                        queue_name: queue_name.to_string(),
                    }
                } else {
                    service_error("GetQueueUrl", err)
                }
            })?;

        output
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| SqsError::QueueNotFound {
                queue_name: queue_name.to_string(),
            })
    }

    async fn send_entries(
        &self,
        queue_url: &str,
        entries: Vec<OutgoingEntry>,
    ) -> Result<BatchOutcome> {
        let entries = entries
            .into_iter()
            .map(|entry| {
                SendMessageBatchRequestEntry::builder()
                    .id(entry.id)
                    .message_body(entry.body)
                    .set_message_group_id(entry.group_id)
                    .set_message_deduplication_id(entry.deduplication_id)
                    .build()
                    .map_err(|e| SqsError::ValidationError {
                        message: format!("Invalid send entry: {}", e),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let output = self
            .client
            .send_message_batch()
            .queue_url(queue_url)
            .set_entries(Some(entries))
            .send()
            .await
            .map_err(|err| service_error("SendMessageBatch", err))?;

        Ok(BatchOutcome {
            successful: output
                .successful()
                .iter()
                .map(|entry| entry.id().to_string())
                .collect(),
            failed: output.failed().iter().map(to_batch_failure).collect(),
        })
    }

    async fn receive(
        &self,
        queue_url: &str,
        request: &ReceiveRequest,
    ) -> Result<Vec<ReceivedMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(request.max_messages)
            .visibility_timeout(request.visibility_timeout)
            .wait_time_seconds(request.wait_time)
            .send()
            .await
            .map_err(|err| service_error("ReceiveMessage", err))?;

        Ok(output
            .messages()
            .iter()
            .filter_map(|message| {
                let receipt = message.receipt_handle()?;
                Some(ReceivedMessage {
                    body: message.body().unwrap_or_default().to_string(),
                    receipt: receipt.to_string(),
                    message_id: message.message_id().map(str::to_string),
                })
            })
            .collect())
    }

    async fn delete_entries(
        &self,
        queue_url: &str,
        entries: Vec<DeleteEntry>,
    ) -> Result<BatchOutcome> {
        let entries = entries
            .into_iter()
            .map(|entry| {
                DeleteMessageBatchRequestEntry::builder()
                    .id(entry.id)
                    .receipt_handle(entry.receipt)
                    .build()
                    .map_err(|e| SqsError::ValidationError {
                        message: format!("Invalid delete entry: {}", e),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let output = self
            .client
            .delete_message_batch()
            .queue_url(queue_url)
            .set_entries(Some(entries))
            .send()
            .await
            .map_err(|err| {
                if err.code() == Some(RECEIPT_HANDLE_IS_INVALID) {
                    SqsError::ReceiptHandleInvalid {
                        message: err.message().unwrap_or_default().to_string(),
                    }
                } else {
                    service_error("DeleteMessageBatch", err)
                }
            })?;

        Ok(BatchOutcome {
            successful: output
                .successful()
                .iter()
                .map(|entry| entry.id().to_string())
                .collect(),
            failed: output.failed().iter().map(to_batch_failure).collect(),
        })
    }
}

fn to_batch_failure(entry: &BatchResultErrorEntry) -> BatchFailure {
    BatchFailure {
        id: entry.id().to_string(),
        code: entry.code().to_string(),
        message: entry.message().map(str::to_string),
        sender_fault: entry.sender_fault(),
    }
}

fn service_error<E, R>(operation: &str, err: SdkError<E, R>) -> SqsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    tracing::debug!("SQS {} error: {}", operation, DisplayErrorContext(&err));

    SqsError::ServiceError {
        operation: operation.to_string(),
        code,
        message,
    }
}
