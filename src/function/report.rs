// report.rs
use super::ProbeError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Absolute URL for exactly one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn join(base_url: &str, candidate: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        if candidate.starts_with('/') {
            Target(format!("{}{}", base, candidate))
        } else {
            Target(format!("{}/{}", base, candidate))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Status(u16),
    Failed(ProbeError),
}

/// Outcome of one probe.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub candidate: String,
    pub target: Target,
    /// Request start to header receipt (or to the failure).
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl ProbeResult {
    pub fn status(&self) -> Option<u16> {
        match self.outcome {
            Outcome::Status(code) => Some(code),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match &self.outcome {
            Outcome::Failed(err) => Some(err),
            Outcome::Status(_) => None,
        }
    }

    /// Line appended to the output file.
    pub fn log_line(&self) -> String {
        match &self.outcome {
            Outcome::Status(code) => format!(
                "{} - Status: {} - Time: {:.2}s",
                self.target,
                code,
                self.elapsed.as_secs_f64()
            ),
            Outcome::Failed(err) => format!(
                "{} - Error: {} - Time: {:.2}s",
                self.target,
                err,
                self.elapsed.as_secs_f64()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Found,
    Restricted,
    OtherMatch,
    NotMatched,
    Error,
}

impl Tier {
    /// Tiers that go to the output file.
    pub fn is_reportable(self) -> bool {
        !matches!(self, Tier::NotMatched)
    }

    pub fn is_match(self) -> bool {
        matches!(self, Tier::Found | Tier::Restricted | Tier::OtherMatch)
    }
}

/// Failure beats everything; then filter membership; then the status itself.
pub fn classify(result: &ProbeResult, filter_codes: &BTreeSet<u16>) -> Tier {
    match result.outcome {
        Outcome::Failed(_) => Tier::Error,
        Outcome::Status(code) if filter_codes.contains(&code) => match code {
            200 => Tier::Found,
            401 | 403 => Tier::Restricted,
            _ => Tier::OtherMatch,
        },
        Outcome::Status(_) => Tier::NotMatched,
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct TierCounts {
    pub found: usize,
    pub restricted: usize,
    pub other_match: usize,
    pub not_matched: usize,
    pub error: usize,
}

impl TierCounts {
    pub fn add(&mut self, tier: Tier) {
        match tier {
            Tier::Found => self.found += 1,
            Tier::Restricted => self.restricted += 1,
            Tier::OtherMatch => self.other_match += 1,
            Tier::NotMatched => self.not_matched += 1,
            Tier::Error => self.error += 1,
        }
    }

    pub fn matches(&self) -> usize {
        self.found + self.restricted + self.other_match
    }

    pub fn total(&self) -> usize {
        self.matches() + self.not_matched + self.error
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub url: Target,
    pub outcome: Outcome,
    pub elapsed_secs: f64,
    pub tier: Tier,
}

impl ReportEntry {
    pub fn new(result: &ProbeResult, tier: Tier) -> Self {
        ReportEntry {
            url: result.target.clone(),
            outcome: result.outcome.clone(),
            elapsed_secs: result.elapsed.as_secs_f64(),
            tier,
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub started_at: String,
    pub duration_secs: f64,
    pub candidates: usize,
    pub counts: TierCounts,
    pub entries: Vec<ReportEntry>,
}
