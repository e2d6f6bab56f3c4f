//! Core utilities for the roomview scene viewer.
//!
//! Foundational pieces shared by every other crate in the workspace:
//! - Error types and result aliases
//! - Logging initialization
//! - Frame timing
//! - Viewer configuration

mod config;
mod error;
mod logging;
mod timer;

pub use config::{AssetConfig, CameraConfig, Config, WindowConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use timer::Timer;
