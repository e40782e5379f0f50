use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Output layout of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    #[default]
    Compact,
    Pretty,
}

#[derive(Debug, Error)]
#[error("Unknown trace format: {value} (expected `compact` or `pretty`)")]
pub struct ParseTraceFormatError {
    pub value: String,
}

impl FromStr for TraceFormat {
    type Err = ParseTraceFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(TraceFormat::Compact),
            "pretty" => Ok(TraceFormat::Pretty),
            _ => Err(ParseTraceFormatError { value: s.to_string() }),
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn tracing_init(level: &str, format: TraceFormat) -> Result<(), TracingInitError> {
    let filter = build_filter(level)?;

    let result = match format {
        TraceFormat::Compact => tracing::subscriber::set_global_default(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact()),
        ),
        TraceFormat::Pretty => tracing::subscriber::set_global_default(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty()),
        ),
    };

    result.map_err(|source| TracingInitError::SetGlobalDefault { source })
}

fn build_filter(level: &str) -> Result<EnvFilter, TracingInitError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|source| TracingInitError::InvalidFilter { source })
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("Invalid filter config: {source}")]
    InvalidFilter {
        #[from]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to set global default subscriber: {source}")]
    SetGlobalDefault {
        #[from]
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}
