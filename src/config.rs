//! Configuration for the different storage backends.
//!
//! Every value comes from the environment; a `.env` file in the working
//! directory is loaded first when present.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::domain::av::frames::FrameSettings;
use crate::domain::videos::VideoFilter;

pub const DEFAULT_VIDEO_PREFIX: &str = "videos/";
pub const DEFAULT_STILLS_PREFIX: &str = "stills/";
pub const DEFAULT_LEDGER_KEY: &str = "processed_videos.json";
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} env var required", var),
            ConfigError::Invalid { var, value } => {
                write!(f, "Invalid value for {}: {:?}", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings shared by every backend.
#[derive(Clone, Debug)]
pub struct StillsConfig {
    /// Prefix listed for source videos
    pub video_prefix: String,
    /// Prefix under which still folders are written
    pub stills_prefix: String,
    /// Key of the processed-videos ledger
    pub ledger_key: String,
    /// Extension allow-list and matching mode
    pub filter: VideoFilter,
    /// ffmpeg sampling parameters
    pub frames: FrameSettings,
    /// Parent of the per-run working directory
    pub work_dir: Option<PathBuf>,
}

impl Default for StillsConfig {
    fn default() -> Self {
        Self {
            video_prefix: DEFAULT_VIDEO_PREFIX.to_string(),
            stills_prefix: DEFAULT_STILLS_PREFIX.to_string(),
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
            filter: VideoFilter::default(),
            frames: FrameSettings::default(),
            work_dir: None,
        }
    }
}

impl StillsConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let extensions = match lookup("VIDEO_EXTENSIONS") {
            Some(raw) => {
                let parsed: Vec<String> = raw
                    .split(',')
                    .map(|ext| ext.trim().trim_start_matches('.').to_string())
                    .filter(|ext| !ext.is_empty())
                    .collect();
                if parsed.is_empty() {
                    return Err(ConfigError::Invalid {
                        var: "VIDEO_EXTENSIONS",
                        value: raw,
                    });
                }
                parsed
            }
            None => defaults.filter.extensions().to_vec(),
        };
        let case_sensitive = parse_var(&lookup, "EXTENSIONS_CASE_SENSITIVE", false)?;

        let frame_rate: f64 = parse_var(&lookup, "FRAME_RATE", defaults.frames.frame_rate)?;
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(ConfigError::Invalid {
                var: "FRAME_RATE",
                value: frame_rate.to_string(),
            });
        }
        let quality: u8 = parse_var(&lookup, "STILLS_QUALITY", defaults.frames.quality)?;
        if !(1..=31).contains(&quality) {
            return Err(ConfigError::Invalid {
                var: "STILLS_QUALITY",
                value: quality.to_string(),
            });
        }

        Ok(Self {
            video_prefix: lookup("VIDEO_PREFIX").unwrap_or(defaults.video_prefix),
            stills_prefix: lookup("STILLS_PREFIX").unwrap_or(defaults.stills_prefix),
            ledger_key: lookup("LEDGER_KEY").unwrap_or(defaults.ledger_key),
            filter: VideoFilter::new(extensions, case_sensitive),
            frames: FrameSettings {
                frame_rate,
                quality,
                ffmpeg_bin: lookup("FFMPEG_BIN").unwrap_or(defaults.frames.ffmpeg_bin),
            },
            work_dir: lookup("WORK_DIR").map(PathBuf::from),
        })
    }
}

/// Configuration for S3-backed runs.
#[cfg(feature = "aws")]
#[derive(Clone, Debug)]
pub struct AwsConfig {
    /// S3 bucket holding videos, stills and the ledger
    pub s3_bucket: String,
    pub stills: StillsConfig,
}

#[cfg(feature = "aws")]
impl AwsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let stills = StillsConfig::from_env()?;
        Ok(Self {
            s3_bucket: env::var("S3_BUCKET").map_err(|_| ConfigError::Missing("S3_BUCKET"))?,
            stills,
        })
    }
}

/// Configuration for runs against a local directory.
#[derive(Clone, Debug)]
pub struct LocalConfig {
    /// Directory acting as the bucket
    pub store_root: PathBuf,
    pub stills: StillsConfig,
}

impl LocalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let stills = StillsConfig::from_env()?;
        let store_root = env::var("STORE_ROOT").map_err(|_| ConfigError::Missing("STORE_ROOT"))?;
        Ok(Self {
            store_root: PathBuf::from(store_root),
            stills,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}
