//! Training run utilities
//!
//! This library provides the small pieces of plumbing a training script needs
//! around its model code: persisting experiment configs, logging running
//! metric averages, and seeding random generators reproducibly.
//!
//! # Modules
//!
//! - `config`: JSON-backed experiment configuration (`Config`)
//! - `logger`: Running-average metric logger (`RunningLogger`)
//! - `error`: Error types for the above
//! - `utils`: Seeding (`seed_all`) and number formatting (`num2str`)

pub mod config;
pub mod error;
pub mod logger;
pub mod utils;

pub use config::Config;
pub use error::{ConfigError, LoggerError};
pub use logger::RunningLogger;
