// Adapters layer: concrete QueueClient implementations for external systems.

pub mod sqs;

pub use sqs::AwsSqsClient;
