pub mod analyzers;
pub mod config;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod range;
pub mod services;

pub use error::{Error, Result};
