//! Opaque handle to the taxpayer's A1 certificate.

use std::fmt;

/// PEM-encoded certificate and private key, as issued for NFSe signing.
///
/// The client never interprets the material itself; it hands it to the
/// signer collaborator and to the default transport for TLS client auth.
#[derive(Clone)]
pub struct Certificate {
    pem: Vec<u8>,
}

impl Certificate {
    /// Wrap PEM bytes containing the certificate and its private key.
    pub fn from_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self { pem: pem.into() }
    }

    /// The raw PEM bytes.
    pub fn pem(&self) -> &[u8] {
        &self.pem
    }
}

impl fmt::Debug for Certificate {
    // Key material stays out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("pem_len", &self.pem.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_material() {
        let cert = Certificate::from_pem(b"-----BEGIN CERTIFICATE-----".to_vec());
        let debug = format!("{:?}", cert);
        assert!(!debug.contains("BEGIN CERTIFICATE"));
        assert!(debug.contains("pem_len"));
    }
}
