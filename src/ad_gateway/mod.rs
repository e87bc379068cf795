//! Advertisement backend collaborator: slot pricing and ad creation.

pub mod api;

pub use api::HttpAdGateway;

use serde::{Deserialize, Serialize};

/// Response `message` the backend sends when an ad was stored.
pub const SUCCESS_MESSAGE: &str = "Success";

/// Pricing information for ad slots.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct AdInfo {
    pub current_cost_per_slot: f64,
}

/// A validated ad ready to be sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdSubmission {
    pub description: String,
    pub title: String,
    pub email: String,
    pub company: String,
    #[serde(rename = "URL")]
    pub url: String,
    /// Number of purchased slots.
    pub tokens: u32,
}

/// Backend reply to a create-ad request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CreateAdResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl CreateAdResponse {
    pub fn success() -> Self {
        Self {
            message: Some(SUCCESS_MESSAGE.to_string()),
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.message.as_deref() == Some(SUCCESS_MESSAGE)
    }
}

/// Failures talking to the advertisement backend.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Server error: HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// HTTP collaborator used by the ad builder.
///
/// Calls block; the controller runs them off the host's thread.
pub trait AdGateway: Send + Sync {
    /// `GET /advertisements/info`.
    fn fetch_info(&self) -> Result<AdInfo, GatewayError>;
    /// `POST /advertisements/add`.
    fn create_ad(&self, ad: &AdSubmission) -> Result<CreateAdResponse, GatewayError>;
}
