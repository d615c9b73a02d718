use serde::{Deserialize, Deserializer, Serialize};

/// Echoed identifiers may be absent or null on the wire
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Job message consumed from the request-speech queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpeech {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub video_id: String,
    pub job_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_email: String,
    pub sentences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_pitch: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_pause_before_in_millis: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_pause_after_in_millis: Option<u32>,
}

/// The identifying part of a job message. Decoded on its own when the full
/// message is malformed, so the failure can still be reported for the job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobIdentifiers {
    pub job_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub video_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_email: String,
}

impl From<&RequestSpeech> for JobIdentifiers {
    fn from(request: &RequestSpeech) -> Self {
        Self {
            job_id: request.job_id.clone(),
            video_id: request.video_id.clone(),
            user_id: request.user_id.clone(),
            user_email: request.user_email.clone(),
        }
    }
}

/// Outcome message published to the speech-result queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResult {
    pub success: bool,
    pub job_id: String,
    pub video_id: String,
    pub user_id: String,
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_durations_in_millis: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration_in_millis: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpeechResult {
    /// Total is always derived from the individual durations
    pub fn success(request: &RequestSpeech, file_link: String, durations: Vec<u64>) -> Self {
        let total = durations.iter().sum();
        Self {
            success: true,
            job_id: request.job_id.clone(),
            video_id: request.video_id.clone(),
            user_id: request.user_id.clone(),
            user_email: request.user_email.clone(),
            file_link: Some(file_link),
            individual_durations_in_millis: Some(durations),
            total_duration_in_millis: Some(total),
            error: None,
        }
    }

    pub fn failure(request: &RequestSpeech, error: impl Into<String>) -> Self {
        Self::rejected(&JobIdentifiers::from(request), error)
    }

    /// Failure for a job known only by its identifiers
    pub fn rejected(job: &JobIdentifiers, error: impl Into<String>) -> Self {
        Self {
            success: false,
            job_id: job.job_id.clone(),
            video_id: job.video_id.clone(),
            user_id: job.user_id.clone(),
            user_email: job.user_email.clone(),
            file_link: None,
            individual_durations_in_millis: None,
            total_duration_in_millis: None,
            error: Some(error.into()),
        }
    }
}
