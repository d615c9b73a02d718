use crate::error::AppError;

/// Failures of a single speech job. Every variant is fatal for the job.
#[derive(Debug, thiserror::Error)]
pub enum SpeechJobError {
    #[error("invalid job: {0}")]
    Invalid(String),
    #[error("speech synthesis failed: {0}")]
    Provider(String),
    #[error("unable to write synthesized audio: {0}")]
    Segment(String),
    #[error("unable to read synthesized audio metadata: {0}")]
    Probe(String),
    #[error("unable to merge audio segments: {0}")]
    Merge(String),
    #[error("unable to store merged audio: {0}")]
    Storage(String),
    #[error("unable to prepare job workspace: {0}")]
    Workspace(#[from] std::io::Error),
    #[error("unable to deliver speech result: {0}")]
    Reporting(String),
}

impl From<SpeechJobError> for AppError {
    fn from(err: SpeechJobError) -> Self {
        match err {
            SpeechJobError::Invalid(msg) => AppError::BadRequest(msg),
            SpeechJobError::Provider(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}
