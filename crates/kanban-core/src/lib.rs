pub mod config;
pub mod error;
pub mod result;

pub use config::{ApiConfig, AppConfig, SyncConfig};
pub use error::KanbanError;
pub use result::KanbanResult;
