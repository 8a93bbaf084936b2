//! Application layer - Generic services that use ports.

pub mod job;
pub mod lister;
pub mod uploader;

pub use job::{JobState, RunSummary, StillsJob};
