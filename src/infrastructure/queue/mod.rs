pub mod sqs;

pub use sqs::{SqsJobQueue, SqsResultPublisher};

use crate::domain::speech::SpeechResult;
use async_trait::async_trait;

/// A job message pulled from the work queue
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
}

/// Source of speech job messages
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Wait for up to `max_messages` messages; an empty batch is normal
    async fn receive(&self, max_messages: usize) -> Result<Vec<QueueMessage>, String>;

    /// Remove a message once its outcome has been recorded downstream
    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), String>;
}

/// Downstream channel for job outcomes
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    /// Returns only after the queue has accepted the message
    async fn publish(&self, result: &SpeechResult) -> Result<(), String>;
}
