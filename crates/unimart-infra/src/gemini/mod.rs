//! Google Gemini backend for the safety classifier and the listing
//! description generator.

mod client;
mod config;
mod types;

pub use client::GeminiClient;
pub use config::GeminiConfig;
