//! Client-side counters
//!
//! - `notes_client_requests_total` (counter): label `status`
//! - `notes_client_token_refresh_total` (counter): label `outcome`
//! - `notes_client_deauthentications_total` (counter): label `reason`
//!
//! Nothing is exported from here; the counters are no-ops unless the host
//! process installs a `metrics` recorder.

/// Record one HTTP exchange with the API (original or retry).
pub fn record_response(status: u16) {
    metrics::counter!("notes_client_requests_total", "status" => status.to_string()).increment(1);
}

/// Record a refresh attempt: `success`, `rejected`, `network` or `reused`.
pub fn record_refresh(outcome: &'static str) {
    metrics::counter!("notes_client_token_refresh_total", "outcome" => outcome).increment(1);
}

/// Record credentials being cleared because re-authentication is required.
pub fn record_deauthentication(reason: &'static str) {
    metrics::counter!("notes_client_deauthentications_total", "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        record_response(200);
        record_refresh("success");
        record_deauthentication("no_refresh_token");
    }
}
