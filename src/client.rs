//! Webservice client orchestration.
//!
//! Resolves the municipality parameters once at construction, then per call:
//! pick the environment URL, build the envelope, hand it to the transport,
//! and extract the payload from the response.

use crate::certificate::Certificate;
use crate::config::{Environment, ServiceConfig};
use crate::envelope::{build_envelope, build_provider_tag};
use crate::error::Error;
use crate::parser::extract_response_content;
use crate::registry::{MunicipalityMetadata, MunicipalityRegistry};
use crate::signer::{Canonicalization, SignatureAlgorithm, SigningRequest, XmlSigner};
use crate::transport::{HttpsTransport, SoapTransport};
use tracing::debug;

/// Client for one provider/municipality pair.
///
/// Municipality metadata, the environment, and the `prestador` fragment are
/// fixed at construction. `send` takes `&mut self`: the request/response
/// diagnostic slots are single-slot, last-writer-wins, so concurrent use of
/// one client requires external serialization.
pub struct NfseClient {
    config: ServiceConfig,
    certificate: Certificate,
    signer: Box<dyn XmlSigner>,
    metadata: MunicipalityMetadata,
    environment: Environment,
    provider_tag: String,
    transport: Option<Box<dyn SoapTransport>>,
    last_request: Option<String>,
    last_response: Option<String>,
}

impl NfseClient {
    /// Build a client against the bundled municipality table.
    pub fn new(
        config: ServiceConfig,
        certificate: Certificate,
        signer: impl XmlSigner + 'static,
    ) -> Result<Self, Error> {
        Self::with_registry(config, certificate, signer, MunicipalityRegistry::bundled())
    }

    /// Build a client against an injected municipality table.
    pub fn with_registry(
        config: ServiceConfig,
        certificate: Certificate,
        signer: impl XmlSigner + 'static,
        registry: &MunicipalityRegistry,
    ) -> Result<Self, Error> {
        let metadata = registry.resolve(&config.municipality_code)?.clone();
        let environment = config.environment();
        let provider_tag = build_provider_tag(&config, &metadata);
        debug!(
            municipality = %config.municipality_code,
            environment = %environment,
            "resolved webservice parameters"
        );
        Ok(Self {
            config,
            certificate,
            signer: Box::new(signer),
            metadata,
            environment,
            provider_tag,
            transport: None,
            last_request: None,
            last_response: None,
        })
    }

    /// Inject a transport, replacing the default for every later `send`.
    pub fn load_transport(&mut self, transport: Box<dyn SoapTransport>) {
        self.transport = Some(transport);
    }

    /// Sign an XML fragment with the parameters the webservice validates.
    pub fn sign(&self, content: &str, tag_name: &str) -> Result<String, Error> {
        let request = SigningRequest {
            content,
            tag_name,
            id_attribute: "",
            algorithm: SignatureAlgorithm::Sha1,
            canonicalization: Canonicalization::default(),
            root_tag: tag_name,
        };
        self.signer.sign(&self.certificate, &request)
    }

    /// Send a message to the webservice and return the extracted payload.
    pub fn send(&mut self, message: &str, operation: &str) -> Result<String, Error> {
        let url = self.active_url()?.to_string();
        let action = format!("urn:{operation}");

        let request = build_envelope(
            message,
            operation,
            &self.metadata.schema_version,
            &self.metadata.soap_namespace,
        );
        self.last_request = Some(request.clone());

        let headers = vec![
            (
                "Content-Type".to_string(),
                format!("application/soap+xml;charset=UTF-8;action=\"{action}\""),
            ),
            ("Content-Length".to_string(), request.len().to_string()),
        ];

        // Default transport is built lazily, once; an injected one is kept.
        let mut transport: Box<dyn SoapTransport> = match self.transport.take() {
            Some(t) => t,
            None => Box::new(HttpsTransport::new(&self.certificate)?),
        };
        debug!(operation, url = %url, environment = %self.environment, "sending request");
        let result = transport.send(operation, &url, &action, &request, &headers);
        self.transport = Some(transport);
        let response = result?;

        self.last_response = Some(response.clone());
        extract_response_content(&response)
    }

    /// The `prestador` identity fragment for this provider.
    pub fn provider_tag(&self) -> &str {
        &self.provider_tag
    }

    /// The environment fixed at construction.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// The resolved municipality metadata.
    pub fn metadata(&self) -> &MunicipalityMetadata {
        &self.metadata
    }

    /// The envelope built by the most recent `send`, if any.
    pub fn last_request(&self) -> Option<&str> {
        self.last_request.as_deref()
    }

    /// The raw body returned by the most recent `send`, if any.
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    fn active_url(&self) -> Result<&str, Error> {
        let url = match self.environment {
            Environment::Production => self.metadata.production_url.as_deref(),
            Environment::Homologation => self.metadata.homologation_url.as_deref(),
        };
        match url {
            Some(u) if !u.is_empty() => Ok(u),
            _ => Err(Error::MissingEndpoint {
                environment: self.environment,
                municipality: self.config.municipality_code.clone(),
            }),
        }
    }
}
