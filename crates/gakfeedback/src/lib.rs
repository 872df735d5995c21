//! `gakfeedback` - Local capture and review of process feedback
//!
//! This library stores feedback submissions (process improvements and
//! recurring problems) as a single JSON collection in a key-value slot, and
//! provides listing, filtering, deletion, export and rendering on top of it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod render;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{FeedbackForm, FeedbackRecord, FilterField, ValidationError};
pub use storage::{Slot, Storage, StorageStats};
pub use store::{ExportSnapshot, FeedbackStore};
