//! Request envelope construction.
//!
//! The webservice family expects the inner XML document to be HTML-entity
//! escaped (PHP `htmlentities` with `ENT_NOQUOTES` semantics), not merely
//! XML-escaped: besides `&`, `<` and `>`, every Latin-1 character with a
//! named entity is written as that entity, and quotes are left untouched.
//! Server-side decoding depends on this exact form.

use crate::config::ServiceConfig;
use crate::registry::MunicipalityMetadata;

/// SOAP 1.2 envelope namespace.
pub const SOAP_12_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Named entities for U+00A0..=U+00FF, indexed by `code - 0xA0`.
const LATIN1_ENTITIES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect",
    "uml", "copy", "ordf", "laquo", "not", "shy", "reg", "macr",
    "deg", "plusmn", "sup2", "sup3", "acute", "micro", "para", "middot",
    "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil",
    "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times",
    "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig",
    "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml",
    "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide",
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
];

fn named_entity(c: char) -> Option<&'static str> {
    let code = c as u32;
    if (0xA0..=0xFF).contains(&code) {
        Some(LATIN1_ENTITIES[(code - 0xA0) as usize])
    } else {
        None
    }
}

/// HTML-entity escape a message body for embedding in the `ser:xml` element.
///
/// Quotes pass through unchanged; characters outside the named-entity range
/// pass through as-is.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => match named_entity(c) {
                Some(name) => {
                    out.push('&');
                    out.push_str(name);
                    out.push(';');
                }
                None => out.push(c),
            },
        }
    }
    out
}

/// Build the SOAP 1.2 request envelope for one operation.
///
/// Element order (Header, then Body holding the operation element with
/// `nrVersaoXml` before `xml`) is significant to some server implementations.
pub fn build_envelope(
    message: &str,
    operation: &str,
    schema_version: &str,
    namespace: &str,
) -> String {
    let msg = html_escape(message);
    format!(
        "<soap:Envelope xmlns:soap=\"{SOAP_12_NS}\" xmlns:ser=\"{namespace}\">\
         <soap:Header/>\
         <soap:Body>\
         <ser:{operation}>\
         <ser:nrVersaoXml>{schema_version}</ser:nrVersaoXml>\
         <ser:xml>{msg}</ser:xml>\
         </ser:{operation}>\
         </soap:Body>\
         </soap:Envelope>"
    )
}

/// Build the `prestador` identity fragment embedded in signed requests.
///
/// Pure concatenation; the ids are not validated and propagate verbatim.
pub fn build_provider_tag(config: &ServiceConfig, metadata: &MunicipalityMetadata) -> String {
    format!(
        "<prestador>\
         <nrInscricaoMunicipal>{}</nrInscricaoMunicipal>\
         <cnpj>{}</cnpj>\
         <idEntidade>{}</idEntidade>\
         </prestador>",
        config.municipal_registration, config.cnpj, metadata.provider_entity
    )
}
