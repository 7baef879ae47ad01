#![forbid(unsafe_code)]

//! Global subscriber setup for hosts that want Kartan's logs.
//!
//! Crates log through `tracing` under the `kartan.*` targets and never install
//! a subscriber themselves. Native hosts and test harnesses call [`init`]
//! once; the filter comes from `KARTAN_LOG` (e.g. `kartan.selection=debug`)
//! and defaults to `info`.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Environment variable holding the filter directives.
pub const ENV_VAR: &str = "KARTAN_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Output format of the global subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Fmt,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fmt" | "text" | "pretty" => Ok(Self::Fmt),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fmt => write!(f, "fmt"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Build the filter from `KARTAN_LOG`, falling back to `info`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber.
///
/// Fails if another global subscriber is already set.
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    let builder = tfmt().with_env_filter(env_filter()).with_target(true);
    match format {
        LogFormat::Fmt => builder.finish().try_init(),
        LogFormat::Json => builder.json().flatten_event(true).finish().try_init(),
    }
}
