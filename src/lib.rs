pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{EvaluationError, Result};
pub use generator::task::{EvaluationTask, TaskStatus};
pub use generator::workflow::{EvaluationOptions, EvaluationOrchestrator};
pub use llm::{GenerationClient, GenerationOptions, LLMClient};
pub use types::{BusinessConcept, EvaluationResult};
