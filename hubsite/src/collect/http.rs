use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};

/// User agent sent with every request to the public data services.
pub const USER_AGENT: &str = "hubsite/0.1";

/// Shared blocking HTTP client with a fixed pause applied after every
/// remote call.
///
/// The pause is a rate-limit courtesy to the public APIs this crate pulls
/// from, not a correctness requirement of the pipeline. The same `Fetcher`
/// instance is passed to every collector and to the owner-lookup client, so
/// one value paces the whole acquisition run.
pub struct Fetcher {
    client: Client,
    pause: Duration,
}

impl Fetcher {
    pub fn new(pause: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Fetcher { client, pause })
    }

    /// The underlying client, for building requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Send a prepared request, fail on non-success statuses, and apply the
    /// pacing pause.
    pub fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().context("request failed")?;
        let response = response
            .error_for_status()
            .context("remote returned an error status")?;
        thread::sleep(self.pause);
        Ok(response)
    }
}
