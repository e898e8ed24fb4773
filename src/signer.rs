//! Boundary to the XML-DSig signer collaborator.
//!
//! The client does not implement signing primitives; it hands the signer the
//! content plus a fixed parameter block. The webservice only accepts
//! signatures built with a SHA-1 reference, inclusive canonicalization, and
//! an empty reference URI, so the parameters travel as data and implementors
//! reproduce that exact shape.

use crate::certificate::Certificate;
use crate::error::Error;

/// Digest/signature algorithm requested from the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

/// Canonicalization options, in C14N order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canonicalization {
    pub exclusive: bool,
    pub with_comments: bool,
    pub xpath: Option<String>,
    pub prefix_list: Option<Vec<String>>,
}

/// One signing request as handed to the collaborator.
#[derive(Debug)]
pub struct SigningRequest<'a> {
    /// XML fragment to sign.
    pub content: &'a str,
    /// Element whose contents the signature covers.
    pub tag_name: &'a str,
    /// Id attribute used for the reference URI; empty emits no URI.
    pub id_attribute: &'a str,
    pub algorithm: SignatureAlgorithm,
    pub canonicalization: Canonicalization,
    /// Element under which the `Signature` block is appended.
    pub root_tag: &'a str,
}

/// External XML-DSig signer.
///
/// Fails with [`Error::Signing`] when the certificate is invalid or expired,
/// or the content is not well-formed XML.
pub trait XmlSigner: Send + Sync {
    fn sign(&self, certificate: &Certificate, request: &SigningRequest<'_>)
        -> Result<String, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_canonicalization_is_inclusive() {
        let c14n = Canonicalization::default();
        assert!(!c14n.exclusive);
        assert!(!c14n.with_comments);
        assert!(c14n.xpath.is_none());
        assert!(c14n.prefix_list.is_none());
    }
}
