pub mod config;
pub mod error;
pub mod records;

pub use config::RegistrarConfig;
pub use error::{RegistrarError, Result};
pub use records::{RecordStore, StudentRecord};
