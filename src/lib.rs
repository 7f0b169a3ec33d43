pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod loader;
pub mod model;
pub mod schema;
pub mod writer;

pub use cli::Cli;
pub use config::SeedConfig;
pub use error::{Result, SeedError};
pub use writer::{generate, GenerationReport};
