//! HTTPS transport for ePOS-Print documents
//!
//! POSTs serialized envelopes to the printer's `service.cgi` endpoint and
//! probes reachability with an empty envelope.

use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::error::{PrintError, PrintResult};

/// Minimal envelope used as the reachability probe
const HEARTBEAT_DOCUMENT: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\">\n  <s:Body>\n    <epos-print xmlns=\"http://www.epson-pos.com/schemas/2011/03/epos-print\"></epos-print>\n  </s:Body>\n</s:Envelope>";

/// Trait for document transports
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send one serialized document to the printer
    async fn send(&self, document: &str) -> PrintResult<()>;

    /// Check if the printer is reachable; success is any non-error response
    async fn check_online(&self) -> bool;
}

/// HTTPS transport for Epson ePOS-Print network printers
#[derive(Debug, Clone)]
pub struct EposTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl EposTransport {
    /// Create a transport for the given printer host or IP
    pub fn new(host: &str, timeout: Duration) -> PrintResult<Self> {
        if host.is_empty() {
            return Err(PrintError::InvalidConfig("empty printer host".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PrintError::InvalidConfig(format!("HTTP client: {e}")))?;

        let endpoint = format!(
            "https://{host}/cgi-bin/epos/service.cgi?devid=local_printer&timeout={}",
            timeout.as_millis()
        );

        Ok(Self { client, endpoint })
    }

    /// The full service endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for EposTransport {
    #[instrument(skip(self, document), fields(endpoint = %self.endpoint, len = document.len()))]
    async fn send(&self, document: &str) -> PrintResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "")
            // Fixed epoch date as a cache-buster
            .header(
                reqwest::header::IF_MODIFIED_SINCE,
                "Thu, 01 Jun 1970 00:00:00 GMT",
            )
            .body(document.to_string())
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "printer rejected document");
            return Err(PrintError::Status(status.as_u16()));
        }

        info!("document accepted");
        Ok(())
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn check_online(&self) -> bool {
        match self.send(HEARTBEAT_DOCUMENT).await {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "printer offline");
                false
            }
        }
    }
}

fn map_request_error(error: reqwest::Error) -> PrintError {
    if error.is_timeout() {
        PrintError::Timeout(error.to_string())
    } else {
        PrintError::Connection(error.to_string())
    }
}
