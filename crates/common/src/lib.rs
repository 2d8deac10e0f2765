//! Reelplan Common Utilities
//!
//! Shared infrastructure for all Reelplan crates:
//! - Error types and result aliases
//! - Session clock and rate control for playback notifications
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
