pub mod dto;
pub mod error;
pub mod merger;
pub mod publisher;
pub mod segment;
pub mod service;
pub mod workspace;

pub use dto::{JobIdentifiers, RequestSpeech, SpeechResult};
pub use error::SpeechJobError;
pub use segment::AudioSegment;
pub use service::{SpeechJobService, SpeechJobServiceApi};
pub use workspace::Workspace;
