pub mod config;
pub mod error;
pub mod types;

pub use config::VoxConfig;
pub use error::{Result, VoxError};
pub use types::*;
