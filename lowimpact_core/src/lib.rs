#![forbid(unsafe_code)]

//! Core domain model and business logic for the low impact daily trainer.
//!
//! This crate provides:
//! - Domain types (categories, levels, steps, sessions, progress)
//! - Session templates and the session generator
//! - Streak and difficulty progression
//! - Session playback with per-step countdowns
//! - Persistence behind a string-keyed store

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod progress;
pub mod playback;
pub mod trainer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::build_session;
pub use config::Config;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use progress::{Completion, ProgressTracker};
pub use playback::{Advance, Countdown, Playback, PlaybackState, TimerId};
pub use trainer::{Overview, StepAdvance, Trainer};
