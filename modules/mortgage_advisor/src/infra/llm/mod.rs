//! Language model clients

pub mod openai;

pub use openai::{OpenAiClient, OpenAiClientConfig};
