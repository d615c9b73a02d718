pub mod config;
pub mod http;
pub mod media;
pub mod queue;
pub mod repositories;
pub mod storage;
