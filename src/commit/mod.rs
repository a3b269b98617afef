//! Commit message generation: diff truncation, provider call, extraction.

pub mod message;
pub mod truncate;

pub use message::generate_commit_message;
pub use truncate::{TRUNCATION_MARKER, truncate_diff};
