pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod report;
pub mod scanner;
pub mod sink;
pub mod wordlist;

pub use self::config::{Config, ScanConfig};
pub use self::error::{ProbeError, ScanError};
pub use self::report::{Outcome, ProbeResult, ScanReport, Target, Tier};
pub use self::scanner::{run, run_scan};
