//! Utility modules
//!
//! Provides logging setup, atomic file writes and console prompts.

pub mod fs;
pub mod logging;
pub mod prompt;

pub use fs::write_atomic;
pub use logging::{data_dir, init_logging};
pub use prompt::{confirm, prompt_with_default};
