pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod importer;
pub mod progress;
pub mod prompts;

pub use config::Config;
pub use error::{ConsistencyError, Result};
