//! Error types for the NFSe SOAP client.

use crate::config::Environment;
use thiserror::Error;

/// Failures surfaced by the client.
///
/// Every operation either succeeds or returns exactly one of these; nothing
/// is retried or swallowed internally.
#[derive(Error, Debug)]
pub enum Error {
    /// No webservice parameters are registered for the municipality code.
    #[error("no webservice parameters registered for municipality {0}")]
    UnknownMunicipality(String),

    /// The registry entry has no URL for the active environment.
    #[error("no {environment} endpoint registered for municipality {municipality}")]
    MissingEndpoint {
        environment: Environment,
        municipality: String,
    },

    /// The signer collaborator rejected the certificate or content.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Network, TLS, or transport-construction failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The webservice response is not well-formed XML.
    #[error("response is not well-formed XML: {0}")]
    ResponseParse(String),

    /// The configuration blob or registry table could not be deserialized.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::UnknownMunicipality("9999999".to_string());
        assert_eq!(
            err.to_string(),
            "no webservice parameters registered for municipality 9999999"
        );

        let err = Error::MissingEndpoint {
            environment: Environment::Production,
            municipality: "4118204".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no producao endpoint registered for municipality 4118204"
        );
    }

    #[test]
    fn test_config_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
