//! ffmpeg-backed still extraction.

pub mod cmd;
pub mod frames;
