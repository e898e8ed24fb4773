//! Integration tests for the nfse-equiplano crate.
//!
//! These tests exercise the public API surface end-to-end, combining
//! configuration, registry lookup, envelope construction, transport
//! invocation, and response extraction.

use nfse_equiplano::envelope::{build_envelope, html_escape};
use nfse_equiplano::parser::extract_response_content;
use nfse_equiplano::{
    Certificate, Environment, Error, MunicipalityRegistry, NfseClient, ServiceConfig,
    SigningRequest, SoapTransport, XmlSigner,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helpers: fabricated registry, stub signer, recording transport
// ============================================================================

fn fabricated_registry() -> MunicipalityRegistry {
    MunicipalityRegistry::from_json(
        r#"{
            "9999": {
                "mun": "Teste",
                "soapns": "urn:test",
                "version": "1",
                "homologacao": "https://svc.example/homolog",
                "producao": "https://svc.example/prod",
                "entidade": 99
            },
            "8888": {
                "mun": "Sem Producao",
                "soapns": "urn:test",
                "version": "1",
                "homologacao": "https://svc.example/homolog",
                "producao": "",
                "entidade": 88
            }
        }"#,
    )
    .unwrap()
}

fn service_config(code: &str, environment_flag: u8) -> ServiceConfig {
    ServiceConfig::from_json(&format!(
        r#"{{"cnpj": "99999999000191", "im": "123456", "cmun": "{code}", "tpamb": {environment_flag}}}"#
    ))
    .unwrap()
}

struct StubSigner;

impl XmlSigner for StubSigner {
    fn sign(
        &self,
        _certificate: &Certificate,
        request: &SigningRequest<'_>,
    ) -> Result<String, Error> {
        Ok(format!(
            "{}<Signature>stub</Signature>",
            request.content
        ))
    }
}

#[derive(Debug, Clone)]
struct SentRequest {
    operation: String,
    url: String,
    action: String,
    envelope: String,
    headers: Vec<(String, String)>,
}

#[derive(Clone, Default)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<SentRequest>>>,
    response: String,
}

impl RecordingTransport {
    fn returning(response: &str) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            response: response.to_string(),
        }
    }

    fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl SoapTransport for RecordingTransport {
    fn send(
        &mut self,
        operation: &str,
        url: &str,
        action: &str,
        envelope: &str,
        headers: &[(String, String)],
    ) -> Result<String, Error> {
        self.sent.lock().unwrap().push(SentRequest {
            operation: operation.to_string(),
            url: url.to_string(),
            action: action.to_string(),
            envelope: envelope.to_string(),
            headers: headers.to_vec(),
        });
        Ok(self.response.clone())
    }
}

fn client_for(code: &str, environment_flag: u8) -> NfseClient {
    NfseClient::with_registry(
        service_config(code, environment_flag),
        Certificate::from_pem(b"pem".to_vec()),
        StubSigner,
        &fabricated_registry(),
    )
    .unwrap()
}

// ============================================================================
// Bundled registry
// ============================================================================

#[test]
fn test_bundled_registry_entries_are_complete() {
    let registry = MunicipalityRegistry::bundled();
    assert!(!registry.is_empty());
    for code in registry.codes() {
        let meta = registry.resolve(code).unwrap();
        assert!(!meta.soap_namespace.is_empty());
        assert!(!meta.schema_version.is_empty());
    }
}

#[test]
fn test_bundled_registry_rejects_unknown_code() {
    assert!(matches!(
        MunicipalityRegistry::bundled().resolve("1234567"),
        Err(Error::UnknownMunicipality(_))
    ));
}

#[test]
fn test_client_against_bundled_registry() {
    let config = service_config("4118204", 2);
    let client = NfseClient::new(config, Certificate::from_pem(b"pem".to_vec()), StubSigner).unwrap();
    assert_eq!(client.environment(), Environment::Homologation);
    assert_eq!(client.metadata().municipality, "Paranagua");
}

// ============================================================================
// End-to-end send scenario
// ============================================================================

#[test]
fn test_e2e_send_production() {
    let mut client = client_for("9999", 1);
    let transport = RecordingTransport::returning(
        "<soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
         <soap:Body><return>OK</return></soap:Body></soap:Envelope>",
    );
    client.load_transport(Box::new(transport.clone()));

    let payload = client.send("<doc/>", "EnviarLoteRps").unwrap();
    assert_eq!(payload, "OK");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.operation, "EnviarLoteRps");
    assert_eq!(request.url, "https://svc.example/prod");
    assert_eq!(request.action, "urn:EnviarLoteRps");
    assert!(request.envelope.contains(
        "<ser:EnviarLoteRps>\
         <ser:nrVersaoXml>1</ser:nrVersaoXml>\
         <ser:xml>&lt;doc/&gt;</ser:xml>\
         </ser:EnviarLoteRps>"
    ));
    assert!(request
        .envelope
        .starts_with("<soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\" xmlns:ser=\"urn:test\">"));

    // The diagnostic slot holds exactly what went over the wire.
    assert_eq!(client.last_request(), Some(request.envelope.as_str()));
}

#[test]
fn test_e2e_homologation_url_selected_for_non_production_flags() {
    for flag in [0, 2, 3] {
        let mut client = client_for("9999", flag);
        let transport = RecordingTransport::returning("<r><return>OK</return></r>");
        client.load_transport(Box::new(transport.clone()));
        client.send("<doc/>", "Op").unwrap();
        assert_eq!(transport.sent()[0].url, "https://svc.example/homolog");
    }
}

#[test]
fn test_e2e_content_headers() {
    let mut client = client_for("9999", 1);
    let transport = RecordingTransport::returning("<r><return>OK</return></r>");
    client.load_transport(Box::new(transport.clone()));
    client.send("<doc/>", "EnviarLoteRps").unwrap();

    let request = &transport.sent()[0];
    assert_eq!(
        request.headers,
        vec![
            (
                "Content-Type".to_string(),
                "application/soap+xml;charset=UTF-8;action=\"urn:EnviarLoteRps\"".to_string()
            ),
            (
                "Content-Length".to_string(),
                request.envelope.len().to_string()
            ),
        ]
    );
}

#[test]
fn test_e2e_missing_production_endpoint() {
    let mut client = client_for("8888", 1);
    let transport = RecordingTransport::returning("<r><return>OK</return></r>");
    client.load_transport(Box::new(transport.clone()));

    let result = client.send("<doc/>", "Op");
    assert!(matches!(
        result,
        Err(Error::MissingEndpoint {
            environment: Environment::Production,
            ..
        })
    ));
    // Failure happens before any transport invocation.
    assert!(transport.sent().is_empty());
}

#[test]
fn test_e2e_sign_then_send() {
    let mut client = client_for("9999", 1);
    let transport = RecordingTransport::returning("<r><return>1</return></r>");
    client.load_transport(Box::new(transport.clone()));

    let message = format!("<enviarLoteRpsEnvio>{}</enviarLoteRpsEnvio>", client.provider_tag());
    let signed = client.sign(&message, "enviarLoteRpsEnvio").unwrap();
    client.send(&signed, "esRecepcionarLoteRps").unwrap();

    let envelope = &transport.sent()[0].envelope;
    // The signed document rides inside ser:xml, HTML-escaped.
    assert!(envelope.contains("&lt;nrInscricaoMunicipal&gt;123456&lt;/nrInscricaoMunicipal&gt;"));
    assert!(envelope.contains("&lt;Signature&gt;stub&lt;/Signature&gt;"));
}

// ============================================================================
// Envelope round-trip through the parser
// ============================================================================

#[test]
fn test_envelope_round_trip_recovers_message() {
    let message = "<rps><tomador>João & Çia</tomador></rps>";
    let envelope = build_envelope(message, "EnviarLoteRps", "1", "urn:test");
    // The envelope itself has no `return` element, so extraction falls back
    // to the `ser:xml` element and decodes the entity-escaped body.
    assert_eq!(extract_response_content(&envelope).unwrap(), message);
}

#[test]
fn test_escaping_is_html_entities_not_xml() {
    let escaped = html_escape("preço > 10 \"reais\"");
    assert_eq!(escaped, "pre&ccedil;o &gt; 10 \"reais\"");
}

// ============================================================================
// Response extraction shapes
// ============================================================================

#[test]
fn test_extract_return_wrapped_payload() {
    let payload = "<retorno><numero>42</numero></retorno>";
    let response = format!(
        "<soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
         <soap:Body><return>{}</return></soap:Body></soap:Envelope>",
        html_escape(payload)
    );
    assert_eq!(extract_response_content(&response).unwrap(), payload);
}

#[test]
fn test_extract_xml_wrapped_payload() {
    let payload = "<consulta><protocolo>7</protocolo></consulta>";
    let response = format!("<r><xml>{}</xml></r>", html_escape(payload));
    assert_eq!(extract_response_content(&response).unwrap(), payload);
}

#[test]
fn test_extract_falls_back_to_raw_response() {
    let response = "<fault><motivo>indisponivel</motivo></fault>";
    assert_eq!(extract_response_content(response).unwrap(), response);
}

#[test]
fn test_send_propagates_parse_error_for_garbage_response() {
    let mut client = client_for("9999", 1);
    client.load_transport(Box::new(RecordingTransport::returning("Bad Gateway")));
    let result = client.send("<doc/>", "Op");
    assert!(matches!(result, Err(Error::ResponseParse(_))));
    // The raw body is still retained for diagnosis.
    assert_eq!(client.last_response(), Some("Bad Gateway"));
}
