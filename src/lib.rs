pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use config::{Config, SeedAccount};
pub use error::BootError;
pub use service::bootstrap::{BootReport, prepare, run};
