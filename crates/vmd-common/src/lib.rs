//! VMD Common Library
//!
//! Shared ambient concerns for the virtual museum data pipeline.
//!
//! Currently this hosts the logging configuration used by every VMD
//! binary; domain logic lives in the individual workspace members.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogLevel, LogOutput};
