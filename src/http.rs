//! Outbound HTTP client shared by the search and model integrations

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::{Result, SafarAiError};

const USER_AGENT: &str = concat!("SafarAI/", env!("CARGO_PKG_VERSION"));

/// Build a client with a per-request timeout and bounded retries on
/// transient failures (connect errors, timeouts, 5xx, 429).
pub fn build_client(timeout_seconds: u32, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SafarAiError::config(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if max_retries > 0 {
        let policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}

/// Describe a failed request without its URL, which may carry credentials
pub(crate) fn describe_failure(error: reqwest_middleware::Error) -> String {
    match error {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
        // retry exhaustion wraps the last reqwest error, URL included
        reqwest_middleware::Error::Middleware(e) => strip_queries(&format!("{e:#}")),
    }
}

/// Cut the query string off every URL in `message`
fn strip_queries(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find("http") {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);
        let end = tail
            .find(|c: char| c.is_whitespace() || c == ')')
            .unwrap_or(tail.len());
        let url = &tail[..end];
        out.push_str(url.split('?').next().unwrap_or(url));
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

/// Shorten an upstream body for log and error messages
pub(crate) fn snippet(body: &str) -> String {
    const LIMIT: usize = 300;
    let trimmed = body.trim();
    if trimmed.chars().count() <= LIMIT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}
