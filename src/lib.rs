pub mod cli;
pub mod config;
pub mod error;

pub use config::{parse, Config};
pub use error::CliError;
