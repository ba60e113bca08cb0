#![forbid(unsafe_code)]

pub mod dto;
pub mod http;
pub mod providers;

pub use http::{ApiConfig, HttpBackend};
pub use providers::{
    ApiError, Backend, CatalogProvider, InMemoryBackend, QuestionProvider, ScoreSubmitter,
    SessionCheck, SessionHeartbeat,
};
