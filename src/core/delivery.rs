//! Alert delivery sinks.
//!
//! A destination is an opaque string: `console` prints to stdout, `http://`
//! and `https://` URLs receive a JSON webhook post. Anything else is rejected
//! so the alert coordinator prunes it.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::{HostwatchError, Result};
use crate::ui::report::ReportPage;

pub const CONSOLE_DESTINATION: &str = "console";

/// Delivers one rendered page to one destination
pub trait DeliverySink: Send + Sync {
    fn deliver(
        &self,
        destination: &str,
        page: &ReportPage,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Whether `destination` names something a [`RoutingSink`] can deliver to
pub fn is_supported_destination(destination: &str) -> bool {
    destination == CONSOLE_DESTINATION || webhook_url(destination).is_ok()
}

fn webhook_url(destination: &str) -> Result<Url> {
    let url = Url::parse(destination)
        .map_err(|e| HostwatchError::delivery_failed(destination, format!("invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HostwatchError::delivery_failed(
            destination,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

/// Prints pages to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DeliverySink for ConsoleSink {
    async fn deliver(&self, destination: &str, page: &ReportPage) -> Result<()> {
        if destination != CONSOLE_DESTINATION {
            return Err(HostwatchError::delivery_failed(destination, "not a console destination"));
        }
        crate::ui::print_page(page);
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts pages as `{"content": "..."}` to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hostwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl DeliverySink for WebhookSink {
    async fn deliver(&self, destination: &str, page: &ReportPage) -> Result<()> {
        let url = webhook_url(destination)?;
        let text = page.to_text();

        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { content: &text })
            .send()
            .await
            .map_err(|e| HostwatchError::delivery_failed(destination, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HostwatchError::delivery_failed(
                destination,
                format!("webhook returned status {}", status),
            ));
        }

        log::debug!("Delivered '{}' to {}", page.title, destination);
        Ok(())
    }
}

/// Chooses the console or webhook sink from the destination's form
#[derive(Debug, Clone)]
pub struct RoutingSink {
    console: ConsoleSink,
    webhook: WebhookSink,
}

impl RoutingSink {
    pub fn new(webhook_timeout: Duration) -> Result<Self> {
        Ok(Self {
            console: ConsoleSink,
            webhook: WebhookSink::new(webhook_timeout)?,
        })
    }
}

impl DeliverySink for RoutingSink {
    async fn deliver(&self, destination: &str, page: &ReportPage) -> Result<()> {
        if destination == CONSOLE_DESTINATION {
            self.console.deliver(destination, page).await
        } else {
            self.webhook.deliver(destination, page).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_destinations() {
        assert!(is_supported_destination("console"));
        assert!(is_supported_destination("https://hooks.example.com/abc"));
        assert!(is_supported_destination("http://localhost:8080/alert"));
        assert!(!is_supported_destination("ftp://example.com"));
        assert!(!is_supported_destination("#general"));
        assert!(!is_supported_destination(""));
    }

    #[tokio::test]
    async fn test_routing_rejects_unknown_destination() {
        let sink = RoutingSink::new(Duration::from_secs(1)).unwrap();
        let page = ReportPage::new("Test", "body");
        let err = sink.deliver("#general", &page).await.unwrap_err();
        assert!(matches!(err, HostwatchError::DeliveryFailed { .. }));
    }

    #[tokio::test]
    async fn test_console_sink_only_accepts_console() {
        let page = ReportPage::new("Test", "body");
        assert!(ConsoleSink.deliver("console", &page).await.is_ok());
        assert!(ConsoleSink.deliver("https://x.example", &page).await.is_err());
    }

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_string(&WebhookPayload { content: "hi" }).unwrap();
        assert_eq!(json, r#"{"content":"hi"}"#);
    }
}
