//! Request logging for page views.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const ACK_MESSAGE: &str = "Request logged successfully";

/// Body the site posts on every client-side navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page: String,
    #[serde(default)]
    pub referrer: String,
    /// Milliseconds since the Unix epoch, as reported by the browser.
    pub timestamp: i64,
    #[serde(default)]
    pub user_agent: String,
}

#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub forwarded_for: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl RequestInfo {
    /// The body as a [`PageView`], if it is one.
    pub fn page_view(&self) -> Option<PageView> {
        let body = self.body.as_ref()?;
        serde_json::from_value(body.clone()).ok()
    }

    /// Lines describing this request, in the order they are logged.
    pub fn log_lines(&self, at: DateTime<Utc>) -> Vec<String> {
        let mut lines = vec![
            format!("[{}] {} {}", iso_timestamp(at), self.method, self.url),
            format!("User-Agent: {}", self.user_agent.as_deref().unwrap_or("Unknown")),
            format!("Referer: {}", self.referer.as_deref().unwrap_or("Direct")),
            format!("IP: {}", self.forwarded_for.as_deref().unwrap_or("Unknown")),
        ];
        if self.method == "POST" {
            if let Some(body) = &self.body {
                lines.push(format!("Request Body: {}", body));
            }
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogAck {
    pub logged: bool,
    pub timestamp: String,
    pub message: String,
}

/// Logs `req` and returns the acknowledgement sent back to the client.
pub fn log_request(req: &RequestInfo, at: DateTime<Utc>) -> LogAck {
    for line in req.log_lines(at) {
        tracing::info!(target: "folio::pageview", "{}", line);
    }
    if let Some(view) = req.page_view() {
        tracing::debug!(page = %view.page, referrer = %view.referrer, "page view");
    }

    LogAck {
        logged: true,
        timestamp: iso_timestamp(at),
        message: ACK_MESSAGE.to_string(),
    }
}

/// Parses a raw request body; blank input means there is no body.
pub fn parse_body(text: &str) -> serde_json::Result<Option<serde_json::Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some)
}

/// `2024-12-19T08:30:00.123Z`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
