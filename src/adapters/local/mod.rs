//! Local adapters for development runs.

pub mod fs;

pub use fs::FsAdapter;
