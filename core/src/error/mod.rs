mod config_error;
mod job_error;

pub use config_error::ConfigError;
pub use job_error::{ErrorKind, JobError};
