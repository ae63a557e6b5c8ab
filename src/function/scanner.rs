// scanner.rs
use super::probe::probe;
use super::report::{ProbeResult, ReportEntry, ScanReport, Target, TierCounts, classify};
use super::sink::{ConsoleSink, Fanout, FileSink, ReportSink};
use super::{Config, ScanConfig, ScanError};
use chrono::Local;
use colored::Colorize;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Instant;

const USER_AGENT: &str = concat!("api_finder/", env!("CARGO_PKG_VERSION"));

/// CLI entry point: loads the configuration, wires up console and file
/// output, scans, and prints the summary.
pub async fn run_scan(config: Config) -> Result<ScanReport, ScanError> {
    // wordlist and output file problems must surface before any probe
    let scan_config = config.to_scan_config()?;

    let mut sinks = Fanout::new();
    if let Some(path) = &config.output_file {
        sinks.push(FileSink::open(path)?);
    }

    let colors = supports_color(config.no_color);
    colored::control::set_override(colors);
    println!("{}", format!("[*] Starting scan for APIs and endpoints on {}", scan_config.base_url).cyan());
    println!(
        "{}",
        format!(
            "[*] {} paths, at most {} requests in flight, {}s timeout",
            scan_config.candidates.len(),
            scan_config.rate_limit,
            scan_config.timeout.as_secs()
        )
        .cyan()
    );

    sinks.push(ConsoleSink::new(scan_config.candidates.len()));

    let report = run(&scan_config, &sinks).await?;

    if let Some(path) = &config.json_report {
        save_json_report(path, &report)?;
    }

    print_summary(&report);

    Ok(report)
}

/// Probes every candidate once and returns the aggregated report.
///
/// The HTTP client lives for exactly this call. Per-probe failures never
/// surface as `Err`; only building the client can fail.
pub async fn run(config: &ScanConfig, sink: &dyn ReportSink) -> Result<ScanReport, ScanError> {
    let client = build_client(config)?;

    let started_at = Local::now().to_rfc3339();
    let start_time = Instant::now();
    tracing::info!(
        target_url = %config.base_url,
        candidates = config.candidates.len(),
        rate_limit = config.rate_limit,
        "scan started"
    );

    let results = scan(&client, config, sink).await;
    sink.finish();

    let mut counts = TierCounts::default();
    let entries: Vec<ReportEntry> = results
        .iter()
        .map(|result| {
            let tier = classify(result, &config.filter_codes);
            counts.add(tier);
            ReportEntry::new(result, tier)
        })
        .collect();

    let report = ScanReport {
        target: config.base_url.clone(),
        started_at,
        duration_secs: start_time.elapsed().as_secs_f64(),
        candidates: config.candidates.len(),
        counts,
        entries,
    };

    tracing::info!(
        probes = report.counts.total(),
        matches = report.counts.matches(),
        errors = report.counts.error,
        duration_secs = report.duration_secs,
        "scan finished"
    );

    Ok(report)
}

/// Drives all probes with at most `rate_limit` in flight, handing each
/// result to `sink` the moment it completes. Results come back in
/// completion order, one per candidate.
pub async fn scan(client: &Client, config: &ScanConfig, sink: &dyn ReportSink) -> Vec<ProbeResult> {
    let timeout = config.timeout;
    let mut results = Vec::with_capacity(config.candidates.len());

    let mut probes = stream::iter(config.candidates.iter())
        .map(|candidate| {
            let target = Target::join(&config.base_url, candidate);
            probe(client, candidate, target, timeout)
        })
        .buffer_unordered(config.rate_limit.max(1));

    while let Some(result) = probes.next().await {
        let tier = classify(&result, &config.filter_codes);
        tracing::debug!(
            url = %result.target,
            status = ?result.status(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            ?tier,
            "probe completed"
        );
        sink.record(&result, tier);
        results.push(result);
    }

    results
}

pub fn build_client(config: &ScanConfig) -> Result<Client, ScanError> {
    Client::builder()
        .timeout(config.timeout)
        .pool_max_idle_per_host(config.rate_limit)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ScanError::ClientError(format!("failed to build HTTP client: {}", e)))
}

fn supports_color(disabled: bool) -> bool {
    !disabled && std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn save_json_report(output_path: &Path, report: &ScanReport) -> Result<(), ScanError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| ScanError::IOError(format!("cannot create report directory: {}", e)))?;
        }
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(output_path, json)
        .map_err(|e| ScanError::IOError(format!("cannot write report: {}", e)))?;

    println!("[*] JSON report saved to {}", output_path.display());

    Ok(())
}

fn print_summary(report: &ScanReport) {
    let counts = &report.counts;
    println!("\n=== Scan summary ===");
    println!("Target:   {}", report.target);
    println!("Started:  {}", report.started_at);
    println!("Duration: {:.2}s", report.duration_secs);
    println!("Probed:   {}/{}", counts.total(), report.candidates);
    println!("  - found:      {}", counts.found);
    println!("  - restricted: {}", counts.restricted);
    println!("  - other:      {}", counts.other_match);
    println!("  - not found:  {}", counts.not_matched);
    println!("  - errors:     {}", counts.error);
}
