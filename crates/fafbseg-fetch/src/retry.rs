//! Backoff for artifact requests.
//!
//! A request is repeated only when no response arrived at all (refused
//! connection, timeout). Any response, 404 and 500 included, is handed back
//! for the fetcher to judge.

use std::time::Duration;

/// First backoff step; each further retry waits twice as long.
const BASE_DELAY_MS: u64 = 200;

/// Delay before retry number `attempt` (0-based).
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS.saturating_mul(2u64.saturating_pow(attempt)))
}

/// Run `send` until it yields a response or `max_retries` retries are used
/// up, sleeping between attempts.
pub(crate) fn retry_send<F>(
    max_retries: u32,
    send: F,
) -> Result<reqwest::blocking::Response, reqwest::Error>
where
    F: Fn() -> Result<reqwest::blocking::Response, reqwest::Error>,
{
    for attempt in 0..max_retries {
        match send() {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    "no response from artifact service, next attempt in {delay:?}: {e}"
                );
                std::thread::sleep(delay);
            }
        }
    }
    send()
}
