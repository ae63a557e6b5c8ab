// error.rs
use serde::{Serialize, Serializer};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Setup failures. Anything here stops the run before the first probe.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("wordlist file not readable: {}: {source}", path.display())]
    Wordlist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file operation failed: {0}")]
    IOError(String),

    #[error("HTTP client error: {0}")]
    ClientError(String),

    #[error("output file error: {0}")]
    OutputError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> Self {
        ScanError::IOError(err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::SerializationError(err.to_string())
    }
}

/// Why a single probe produced no status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("no response within {}s", after.as_secs_f64())]
    Timeout { after: Duration },

    #[error("connection error: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl ProbeError {
    /// Maps a reqwest failure onto the probe taxonomy. `timeout` is the limit
    /// that was in force for the request.
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout { after: timeout }
        } else if err.is_connect() {
            ProbeError::Connect(describe(err))
        } else {
            ProbeError::Request(describe(err))
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout { .. })
    }
}

impl Serialize for ProbeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// reqwest's Display stops at the outermost layer; the useful part (refused,
// dns, tls) usually sits further down the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
