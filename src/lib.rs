pub mod analysis;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod models;
pub mod output;
pub mod pipeline;
