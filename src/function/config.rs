// config.rs
use super::ScanError;
use super::wordlist::{default_paths, load_wordlist};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "api_finder", about = "Concurrent API and endpoint finder")]
pub struct Config {
    /// Base URL of the target (e.g. https://example.com)
    pub url: String,

    /// Wordlist file, one path per line (defaults to the built-in list)
    #[structopt(long)]
    pub wordlist: Option<PathBuf>,

    /// HTTP status codes reported as matches [default: 200,403,401]
    #[structopt(long, use_delimiter = true, min_values = 0)]
    pub filter_codes: Option<Vec<u16>>,

    /// Maximum number of requests in flight at once
    #[structopt(long, default_value = "10")]
    pub rate_limit: usize,

    /// Request timeout (seconds)
    #[structopt(long, default_value = "10")]
    pub timeout: u64,

    /// Append matches and errors to this file
    #[structopt(long)]
    pub output_file: Option<PathBuf>,

    /// Write a JSON summary of the scan to this file
    #[structopt(long)]
    pub json_report: Option<PathBuf>,

    /// Disable colored output
    #[structopt(long)]
    pub no_color: bool,

    /// More logging (-v info, -vv debug)
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

pub const DEFAULT_FILTER_CODES: [u16; 3] = [200, 403, 401];

/// Everything one scan needs. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub base_url: String,
    pub candidates: Vec<String>,
    pub filter_codes: BTreeSet<u16>,
    pub rate_limit: usize,
    pub timeout: Duration,
}

impl Config {
    pub fn validate(&self) -> Result<(), ScanError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ScanError::InvalidConfig(format!(
                "URL must start with http:// or https://: {}",
                self.url
            )));
        }

        if self.rate_limit == 0 {
            return Err(ScanError::InvalidConfig(
                "--rate-limit must be at least 1".to_string(),
            ));
        }

        if self.timeout == 0 {
            return Err(ScanError::InvalidConfig(
                "--timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates the arguments and loads the candidate list.
    pub fn to_scan_config(&self) -> Result<ScanConfig, ScanError> {
        self.validate()?;

        let candidates = match &self.wordlist {
            Some(path) => load_wordlist(path)?,
            None => default_paths(),
        };

        Ok(ScanConfig {
            base_url: self.url.clone(),
            candidates,
            // flag given with no values means nothing matches
            filter_codes: match &self.filter_codes {
                Some(codes) => codes.iter().copied().collect(),
                None => DEFAULT_FILTER_CODES.into_iter().collect(),
            },
            rate_limit: self.rate_limit,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

impl ScanConfig {
    pub fn new(base_url: impl Into<String>, candidates: Vec<String>) -> Self {
        ScanConfig {
            base_url: base_url.into(),
            candidates,
            filter_codes: DEFAULT_FILTER_CODES.into_iter().collect(),
            rate_limit: 10,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_filter_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.filter_codes = codes.into_iter().collect();
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: usize) -> Self {
        self.rate_limit = rate_limit.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
