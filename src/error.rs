use std::fmt;
use std::io;
use std::path::PathBuf;

use rodio::decoder::DecoderError;
use rodio::{PlayError, StreamError};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ViewportTooSmall {
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },
    NonPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    IntervalTooShort { field: &'static str, ms: u64, tick_ms: u64 },
    NoLives,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewportTooSmall {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "viewport {width}x{height} is too small, need at least {min_width}x{min_height}"
            ),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be greater than zero, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::IntervalTooShort { field, ms, tick_ms } => {
                write!(f, "{field} of {ms}ms is shorter than one {tick_ms}ms tick")
            }
            Self::NoLives => write!(f, "starting lives must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AudioError {
    Open { path: PathBuf, source: io::Error },
    Decode { path: PathBuf, source: DecoderError },
    Device(StreamError),
    Playback(PlayError),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open music file {}: {source}", path.display())
            }
            Self::Decode { path, source } => {
                write!(f, "cannot decode music file {}: {source}", path.display())
            }
            Self::Device(err) => write!(f, "no audio output device: {err}"),
            Self::Playback(err) => write!(f, "cannot start playback: {err}"),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Device(err) => Some(err),
            Self::Playback(err) => Some(err),
        }
    }
}
