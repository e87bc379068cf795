//! `ureq` implementation of [`AdGateway`].

use std::time::Duration;

use serde::Serialize;
use url::Url;

use super::{AdGateway, AdInfo, AdSubmission, CreateAdResponse, GatewayError};
use crate::http_client::{self, RetryConfig};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const INFO_PATH: &str = "advertisements/info";
const ADD_PATH: &str = "advertisements/add";

const MAX_INFO_RESPONSE_BYTES: usize = 16 * 1024;
const MAX_ADD_RESPONSE_BYTES: usize = 64 * 1024;

const INFO_RETRY: RetryConfig = RetryConfig {
    max_attempts: 3,
    base_delay: Duration::from_millis(250),
    max_delay: Duration::from_secs(2),
};

#[derive(Serialize)]
struct CreateAdRequest<'a> {
    ad: &'a AdSubmission,
}

/// Talks to the advertisement backend over HTTP.
#[derive(Clone, Debug)]
pub struct HttpAdGateway {
    base: Url,
    info_retry: RetryConfig,
}

impl HttpAdGateway {
    /// Build a gateway rooted at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            info_retry: INFO_RETRY,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path)
            .map_err(|err| GatewayError::Transport(format!("Invalid endpoint {path}: {err}")))
    }

    fn fetch_info_once(&self) -> Result<AdInfo, GatewayError> {
        let url = self.endpoint(INFO_PATH)?;
        let response = http_client::agent()
            .get(url.as_str())
            .set("Accept", "application/json")
            .call();
        let body = read_body(response, MAX_INFO_RESPONSE_BYTES)?;
        parse_info(&body)
    }
}

impl AdGateway for HttpAdGateway {
    fn fetch_info(&self) -> Result<AdInfo, GatewayError> {
        http_client::retry_with_backoff(
            self.info_retry,
            || self.fetch_info_once(),
            |err| matches!(err, GatewayError::Transport(_)),
        )
    }

    fn create_ad(&self, ad: &AdSubmission) -> Result<CreateAdResponse, GatewayError> {
        let url = self.endpoint(ADD_PATH)?;
        let response = http_client::agent()
            .post(url.as_str())
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .send_json(CreateAdRequest { ad });
        let body = read_body(response, MAX_ADD_RESPONSE_BYTES)?;
        parse_create_ad_response(&body)
    }
}

fn read_body(
    response: Result<ureq::Response, ureq::Error>,
    max_bytes: usize,
) -> Result<String, GatewayError> {
    match response {
        Ok(response) => http_client::read_response_text(response, max_bytes)
            .map_err(|err| GatewayError::InvalidResponse(err.to_string())),
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_response_text(response, max_bytes)
                .unwrap_or_else(|err| err.to_string());
            Err(GatewayError::Status { code, body })
        }
        Err(ureq::Error::Transport(err)) => Err(GatewayError::Transport(err.to_string())),
    }
}

/// Accepts `{"current_cost_per_slot": n}` or the same object under `data`.
fn parse_info(body: &str) -> Result<AdInfo, GatewayError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::InvalidResponse("Empty response body".to_string()));
    }
    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|err| GatewayError::InvalidResponse(format!("{err}: {trimmed}")))?;
    let payload = match value.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => value,
    };
    serde_json::from_value(payload)
        .map_err(|err| GatewayError::InvalidResponse(format!("{err}: {trimmed}")))
}

fn parse_create_ad_response(body: &str) -> Result<CreateAdResponse, GatewayError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::InvalidResponse("Empty response body".to_string()));
    }
    serde_json::from_str(trimmed)
        .map_err(|err| GatewayError::InvalidResponse(format!("{err}: {trimmed}")))
}
