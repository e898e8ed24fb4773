//! SOAP transport boundary and the default HTTPS implementation.
//!
//! The orchestrator hands a fully-built envelope to a [`SoapTransport`];
//! connection pooling, timeouts, and TLS details all live behind this seam.

use crate::certificate::Certificate;
use crate::error::Error;
use tracing::{debug, warn};

/// Performs the network exchange for one SOAP request.
///
/// Implementations receive the operation name, resolved endpoint URL, the
/// `urn:` SOAP action, the serialized envelope, and the prepared headers, and
/// return the raw response body. No retries happen at this layer or above.
pub trait SoapTransport: Send {
    fn send(
        &mut self,
        operation: &str,
        url: &str,
        action: &str,
        envelope: &str,
        headers: &[(String, String)],
    ) -> Result<String, Error>;
}

/// Default transport: HTTPS POST with the certificate as TLS client identity.
pub struct HttpsTransport {
    client: reqwest::blocking::Client,
}

impl HttpsTransport {
    /// Build a client bound to the certificate's PEM identity.
    pub fn new(certificate: &Certificate) -> Result<Self, Error> {
        let identity = reqwest::Identity::from_pem(certificate.pem())
            .map_err(|err| Error::Transport(format!("invalid client certificate: {err}")))?;
        let client = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .build()
            .map_err(|err| Error::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

impl SoapTransport for HttpsTransport {
    fn send(
        &mut self,
        operation: &str,
        url: &str,
        _action: &str,
        envelope: &str,
        headers: &[(String, String)],
    ) -> Result<String, Error> {
        let mut request = self.client.post(url).body(envelope.to_string());
        for (name, value) in headers {
            request = request.header(name, value);
        }

        debug!(operation, url, bytes = envelope.len(), "posting SOAP request");
        let response = request
            .send()
            .map_err(|err| Error::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| Error::Transport(err.to_string()))?;

        // Faults arrive as HTTP 500 with a parseable body; the caller's
        // extraction step is responsible for surfacing them.
        if !status.is_success() {
            warn!(operation, %status, "webservice returned an error status");
        }
        Ok(body)
    }
}
