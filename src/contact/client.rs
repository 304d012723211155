use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use super::uri::{sms_uri, tel_uri, Platform};

const PHONE_PATH: &str = "/api/phone";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What the customer asked to do with the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactIntent {
    #[serde(rename = "tel")]
    Call,
    #[serde(rename = "sms")]
    Text,
}

impl ContactIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "tel",
            Self::Text => "sms",
        }
    }
}

/// Why a contact action did not reach the dialer
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("request blocked by origin check")]
    Forbidden,
    #[error("rate limited")]
    RateLimited,
    #[error("phone number unavailable")]
    Unavailable,
    #[error("a request is already in flight")]
    InFlight,
    #[error("unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ContactError {
    /// Short text shown next to the button
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Forbidden => "Blocked. Please refresh and try again.",
            Self::RateLimited => "Too many requests. Try again in a minute.",
            Self::Unavailable => "Phone temporarily unavailable.",
            Self::InFlight => "One moment...",
            Self::UnexpectedStatus(_) | Self::Transport(_) => "Try again in a moment.",
        }
    }
}

/// Where a built `tel:`/`sms:` link is sent
pub trait NavigationSink: Send + Sync {
    fn navigate(&self, uri: &str);
}

/// Prints the link, for terminals that hand `tel:` links to the OS
#[derive(Debug, Default)]
pub struct StdoutSink;

impl NavigationSink for StdoutSink {
    fn navigate(&self, uri: &str) {
        println!("{}", uri);
    }
}

/// Keeps every link it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    uris: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn uris(&self) -> Vec<String> {
        self.uris.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl NavigationSink for RecordingSink {
    fn navigate(&self, uri: &str) {
        if let Ok(mut uris) = self.uris.lock() {
            uris.push(uri.to_string());
        }
    }
}

#[derive(Debug, Serialize)]
struct RevealBody {
    intent: ContactIntent,
}

#[derive(Debug, Deserialize)]
struct RevealPayload {
    #[serde(default)]
    phone: Option<String>,
}

/// Clears the in-flight flag however the activation ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Client side of the phone reveal: asks the gate for the number and hands
/// the resulting link to a [`NavigationSink`]
pub struct ContactTrigger {
    client: Client,
    endpoint: String,
    origin: String,
    user_agent: Option<String>,
    platform: Platform,
    sink: Arc<dyn NavigationSink>,
    in_flight: AtomicBool,
}

impl ContactTrigger {
    /// `base_url` is the site root, e.g. `https://stellarview.example`
    pub fn new(base_url: &str, sink: Arc<dyn NavigationSink>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let origin = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            endpoint: format!("{}{}", origin, PHONE_PATH),
            origin,
            user_agent: None,
            platform: Platform::Other,
            sink,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Identify as a browser; the SMS separator follows the detected family
    pub fn with_user_agent(mut self, user_agent: impl Into<String>, max_touch_points: u32) -> Self {
        let user_agent = user_agent.into();
        self.platform = Platform::detect(&user_agent, max_touch_points);
        self.user_agent = Some(user_agent);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Reveal the number and navigate to the link for `intent`
    ///
    /// `body` pre-fills text messages and is ignored for calls. A second
    /// activation while one is pending is refused with
    /// [`ContactError::InFlight`].
    pub async fn activate(
        &self,
        intent: ContactIntent,
        body: Option<&str>,
    ) -> Result<String, ContactError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ContactError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let phone = self.fetch_phone(intent).await?;
        let uri = match intent {
            ContactIntent::Call => tel_uri(&phone),
            ContactIntent::Text => sms_uri(&phone, body, self.platform),
        };

        debug!(intent = intent.as_str(), "Navigating to contact link");
        self.sink.navigate(&uri);
        Ok(uri)
    }

    async fn fetch_phone(&self, intent: ContactIntent) -> Result<String, ContactError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::ORIGIN, &self.origin)
            .json(&RevealBody { intent });
        if let Some(ua) = &self.user_agent {
            request = request.header(header::USER_AGENT, ua);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::OK => {}
            StatusCode::FORBIDDEN => return Err(ContactError::Forbidden),
            StatusCode::TOO_MANY_REQUESTS => return Err(ContactError::RateLimited),
            StatusCode::SERVICE_UNAVAILABLE => return Err(ContactError::Unavailable),
            status => return Err(ContactError::UnexpectedStatus(status)),
        }

        let payload: RevealPayload = response.json().await?;
        payload
            .phone
            .filter(|p| !p.is_empty())
            .ok_or(ContactError::Unavailable)
    }
}
