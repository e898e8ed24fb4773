//! SOAP client for Equiplano-family municipal NFSe webservices.
//!
//! Prepares, signs, transmits, and unwraps the XML documents exchanged with a
//! municipality's tax-invoice service. Per-municipality parameters come from
//! a bundled table; requests ride in the SOAP 1.2 envelope the service family
//! expects, with an HTML-entity-escaped body and a `urn:` action; response
//! payloads are recovered through a tolerant ordered fallback.
//!
//! # Features
//!
//! - Municipality lookup (SOAP namespace, schema version, endpoints, entity id)
//! - Homologation/production environment selection
//! - `prestador` identity fragment construction
//! - SOAP 1.2 envelope assembly with wire-compatible HTML-entity escaping
//! - Pluggable transport with a certificate-bound HTTPS default
//! - Response payload extraction (`return` tag, `xml` tag, raw fallback)
//!
//! # Example
//!
//! ```ignore
//! use nfse_equiplano::{Certificate, NfseClient, ServiceConfig};
//!
//! let config = ServiceConfig::from_json(
//!     r#"{"cnpj": "99999999000191", "im": "123456", "cmun": "4118204", "tpamb": 2}"#,
//! )?;
//! let certificate = Certificate::from_pem(std::fs::read("certificado.pem")?);
//!
//! let mut client = NfseClient::new(config, certificate, MySigner)?;
//! let signed = client.sign(&lote_xml, "lote")?;
//! let response = client.send(&signed, "esRecepcionarLoteRps")?;
//! ```

pub mod certificate;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod parser;
pub mod registry;
pub mod signer;
pub mod transport;

pub use certificate::Certificate;
pub use client::NfseClient;
pub use config::{Environment, ServiceConfig};
pub use error::Error;
pub use registry::{MunicipalityMetadata, MunicipalityRegistry};
pub use signer::{Canonicalization, SignatureAlgorithm, SigningRequest, XmlSigner};
pub use transport::{HttpsTransport, SoapTransport};
