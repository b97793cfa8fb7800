pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;

pub use config::Config;
pub use db::Database;
pub use error::{StoreError, StoreResult, ValidationError};
pub use filter::ContactFilter;
