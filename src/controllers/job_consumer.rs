use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::{
    domain::speech::{JobIdentifiers, RequestSpeech, SpeechJobServiceApi},
    infrastructure::queue::{JobQueue, QueueMessage},
};

/// Pause before polling again after the queue itself errored
const RECEIVE_ERROR_PAUSE: Duration = Duration::from_secs(5);

/// What happened to one queue message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Result published and message removed from the queue
    Acknowledged,
    /// Result published but the message could not be removed
    AcknowledgeFailed,
    /// Result could not be published; the message stays for redelivery
    ResultUndelivered,
    /// Body carries no job id; left for the queue's dead-letter redrive
    Undecodable,
}

/// Pulls speech jobs from the work queue and runs one pipeline per message
pub struct SpeechJobConsumer {
    queue: Arc<dyn JobQueue>,
    service: Arc<dyn SpeechJobServiceApi>,
    permits: Arc<Semaphore>,
    max_concurrent_jobs: usize,
}

impl SpeechJobConsumer {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        service: Arc<dyn SpeechJobServiceApi>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            queue,
            service,
            permits: Arc::new(Semaphore::new(max_concurrent_jobs)),
            max_concurrent_jobs,
        }
    }

    /// Poll forever. Jobs run concurrently up to the configured limit and a
    /// receive never asks for more messages than there are free slots.
    pub async fn run(self: Arc<Self>) {
        tracing::info!(
            max_concurrent_jobs = self.max_concurrent_jobs,
            "Speech job consumer started"
        );

        loop {
            // Wait for a free slot before pulling anything off the queue
            let Ok(first) = self.permits.clone().acquire_owned().await else {
                return;
            };
            let free_slots = self.permits.available_permits() + 1;

            let messages = match self.queue.receive(free_slots).await {
                Ok(messages) => messages,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to receive speech jobs");
                    drop(first);
                    tokio::time::sleep(RECEIVE_ERROR_PAUSE).await;
                    continue;
                }
            };

            let mut reserved = Some(first);
            for message in messages {
                let permit = match reserved.take() {
                    Some(permit) => permit,
                    None => match self.permits.clone().acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return,
                    },
                };
                let consumer = self.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    consumer.process_message(message).await;
                });
            }
        }
    }

    /// Handle one message end to end. The message is acknowledged only after
    /// its result has been accepted by the result queue.
    ///
    /// A malformed message that still names its job gets a failure result.
    pub async fn process_message(&self, message: QueueMessage) -> MessageOutcome {
        let (job_id, handled) = match serde_json::from_str::<RequestSpeech>(&message.body) {
            Ok(request) => (request.job_id.clone(), self.service.handle(request).await),
            Err(decode_error) => match serde_json::from_str::<JobIdentifiers>(&message.body) {
                Ok(job) => {
                    tracing::warn!(
                        message_id = %message.message_id,
                        job_id = %job.job_id,
                        error = %decode_error,
                        "Malformed speech job message"
                    );
                    let reason = format!("malformed job message: {}", decode_error);
                    (job.job_id.clone(), self.service.reject(job, reason).await)
                }
                Err(_) => {
                    tracing::error!(
                        message_id = %message.message_id,
                        error = %decode_error,
                        "Undecodable speech job message"
                    );
                    return MessageOutcome::Undecodable;
                }
            },
        };

        if let Err(e) = handled {
            tracing::error!(
                message_id = %message.message_id,
                job_id = %job_id,
                error = %e,
                "Speech job left on queue for redelivery"
            );
            return MessageOutcome::ResultUndelivered;
        }

        match self.queue.acknowledge(&message.receipt_handle).await {
            Ok(()) => MessageOutcome::Acknowledged,
            Err(e) => {
                tracing::error!(
                    message_id = %message.message_id,
                    job_id = %job_id,
                    error = %e,
                    "Failed to acknowledge speech job"
                );
                MessageOutcome::AcknowledgeFailed
            }
        }
    }
}
