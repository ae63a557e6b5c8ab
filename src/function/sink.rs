// sink.rs
use super::ScanError;
use super::report::{ProbeResult, Tier};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Receives every classified result as soon as its probe completes.
///
/// Implementations must not panic or block for long; a failing sink only
/// loses its own output, the scan keeps going.
pub trait ReportSink: Send + Sync {
    fn record(&self, result: &ProbeResult, tier: Tier);

    /// Called once after the last result.
    fn finish(&self) {}
}

/// Human-readable line for the console, without colors.
pub fn console_line(result: &ProbeResult, tier: Tier) -> String {
    let secs = result.elapsed.as_secs_f64();
    match (tier, result.status(), result.error()) {
        (Tier::Error, _, Some(err)) => {
            format!("[ERROR] {} - {} - {:.2}s", result.target, err, secs)
        }
        (Tier::NotMatched, Some(code), _) => {
            format!("[NOT FOUND] {} - Status: {} - {:.2}s", result.target, code, secs)
        }
        (tier, Some(code), _) => {
            let tag = match (tier, code) {
                (Tier::Found, _) => "FOUND",
                (Tier::Restricted, 401) => "UNAUTHORIZED",
                (Tier::Restricted, _) => "FORBIDDEN",
                _ => "OTHER",
            };
            format!("[{}] [{}] {} - {:.2}s", tag, code, result.target, secs)
        }
        // classify() never pairs a status with Error or a failure with a match tier
        _ => format!("[ERROR] {} - {:.2}s", result.target, secs),
    }
}

/// Colored live output, printed above a progress bar.
pub struct ConsoleSink {
    pb: ProgressBar,
}

impl ConsoleSink {
    pub fn new(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);

        ConsoleSink { pb }
    }
}

impl ReportSink for ConsoleSink {
    fn record(&self, result: &ProbeResult, tier: Tier) {
        let line = console_line(result, tier);
        let painted = match tier {
            Tier::Found => line.green(),
            Tier::Restricted => line.yellow(),
            Tier::OtherMatch => line.cyan(),
            Tier::NotMatched | Tier::Error => line.red(),
        };
        // println! on a hidden bar is dropped; suspend always runs the closure
        self.pb.suspend(|| println!("{}", painted));
        self.pb.set_message(result.candidate.clone());
        self.pb.inc(1);
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

/// Appends matches and errors to a plain-text file, one line per result.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ScanError::OutputError(format!("{}: {}", path.display(), e)))?;

        Ok(FileSink {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }
}

impl ReportSink for FileSink {
    fn record(&self, result: &ProbeResult, tier: Tier) {
        if !tier.is_reportable() {
            return;
        }

        // one write_all per line under the lock keeps lines whole
        let line = format!("{}\n", result.log_line());
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to append result");
        }
    }

    fn finish(&self) {
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = file.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to flush output file");
        }
    }
}

/// Forwards each result to every inner sink, in order.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl ReportSink + 'static) {
        self.sinks.push(Box::new(sink));
    }
}

impl ReportSink for Fanout {
    fn record(&self, result: &ProbeResult, tier: Tier) {
        for sink in &self.sinks {
            sink.record(result, tier);
        }
    }

    fn finish(&self) {
        for sink in &self.sinks {
            sink.finish();
        }
    }
}
