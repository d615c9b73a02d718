pub mod health;
pub mod job_consumer;
pub mod speech;
