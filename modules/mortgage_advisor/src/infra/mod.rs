//! Infrastructure layer - storage and external services

pub mod llm;
pub mod storage;
