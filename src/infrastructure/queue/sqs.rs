use super::{JobQueue, QueueMessage, ResultPublisher};
use crate::domain::speech::SpeechResult;
use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use std::sync::Arc;

/// SQS long polling wait, the maximum the service allows
const WAIT_TIME_SECS: i32 = 20;
const MAX_MESSAGES_PER_RECEIVE: i32 = 10;

/// SQS accepts between 1 and 10 messages per receive
fn batch_size(max_messages: usize) -> i32 {
    i32::try_from(max_messages)
        .unwrap_or(MAX_MESSAGES_PER_RECEIVE)
        .clamp(1, MAX_MESSAGES_PER_RECEIVE)
}

pub struct SqsJobQueue {
    sqs_client: Arc<SqsClient>,
    queue_url: String,
}

impl SqsJobQueue {
    pub fn new(sqs_client: Arc<SqsClient>, queue_url: String) -> Self {
        Self {
            sqs_client,
            queue_url,
        }
    }
}

#[async_trait]
impl JobQueue for SqsJobQueue {
    async fn receive(&self, max_messages: usize) -> Result<Vec<QueueMessage>, String> {
        let output = self
            .sqs_client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(batch_size(max_messages))
            .wait_time_seconds(WAIT_TIME_SECS)
            .send()
            .await
            .map_err(|e| format!("SQS receive_message failed: {}", e))?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                let receipt_handle = m.receipt_handle?;
                Some(QueueMessage {
                    message_id: m.message_id.unwrap_or_default(),
                    receipt_handle,
                    body: m.body.unwrap_or_default(),
                })
            })
            .collect();

        Ok(messages)
    }

    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), String> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| format!("SQS delete_message failed: {}", e))?;
        Ok(())
    }
}

pub struct SqsResultPublisher {
    sqs_client: Arc<SqsClient>,
    queue_url: String,
}

impl SqsResultPublisher {
    pub fn new(sqs_client: Arc<SqsClient>, queue_url: String) -> Self {
        Self {
            sqs_client,
            queue_url,
        }
    }
}

#[async_trait]
impl ResultPublisher for SqsResultPublisher {
    async fn publish(&self, result: &SpeechResult) -> Result<(), String> {
        let body = serde_json::to_string(result)
            .map_err(|e| format!("Failed to serialize speech result: {}", e))?;

        let output = self
            .sqs_client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, job_id = %result.job_id, "SQS send_message failed");
                format!("SQS send_message failed: {}", e)
            })?;

        tracing::debug!(
            job_id = %result.job_id,
            message_id = ?output.message_id,
            "Speech result published"
        );
        Ok(())
    }
}
