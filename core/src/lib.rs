//! Build-job execution and output classification for IDE integration of the
//! cargo build tool.
pub mod api;
pub mod config;
pub mod error;
pub mod host;
pub mod job;
pub mod output;
pub mod process;
