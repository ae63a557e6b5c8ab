// probe.rs
use super::ProbeError;
use super::report::{Outcome, ProbeResult, Target};
use reqwest::Client;
use std::time::{Duration, Instant};

/// Issues one GET against `target` and classifies what came back.
///
/// Never fails: transport errors and timeouts come back as
/// [`Outcome::Failed`]. Only the status line and headers are awaited; the
/// body is dropped unread.
pub async fn probe(client: &Client, candidate: &str, target: Target, timeout: Duration) -> ProbeResult {
    let request = client.get(target.as_str()).timeout(timeout);

    let start_time = Instant::now();
    let response = request.send().await;
    let elapsed = start_time.elapsed();

    let outcome = match response {
        Ok(response) => Outcome::Status(response.status().as_u16()),
        Err(e) => Outcome::Failed(ProbeError::from_reqwest(&e, timeout)),
    };

    ProbeResult {
        candidate: candidate.to_string(),
        target,
        elapsed,
        outcome,
    }
}
