//! Per-municipality webservice parameters.
//!
//! The bundled table (`storage/urls_webservices.json`) maps IBGE municipality
//! codes to the SOAP namespace, schema version, endpoint URLs, and provider
//! entity id of each covered municipality. It is embedded at compile time and
//! parsed once into a process-wide read-only registry; tests and callers with
//! their own tables can build a registry from any JSON document instead.

use crate::error::Error;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

const BUNDLED_TABLE: &str = include_str!("../storage/urls_webservices.json");

static BUNDLED: LazyLock<MunicipalityRegistry> = LazyLock::new(|| {
    MunicipalityRegistry::from_json(BUNDLED_TABLE)
        .expect("bundled webservice table is valid JSON")
});

/// Webservice parameters for one municipality.
#[derive(Debug, Clone, Deserialize)]
pub struct MunicipalityMetadata {
    /// Municipality name, informational only.
    #[serde(rename = "mun")]
    pub municipality: String,

    /// SOAP namespace bound to the `ser` prefix in request envelopes.
    #[serde(rename = "soapns")]
    pub soap_namespace: String,

    /// XML schema version sent as `nrVersaoXml`.
    #[serde(rename = "version")]
    pub schema_version: String,

    /// Homologation endpoint. Empty or absent when the municipality has none.
    #[serde(rename = "homologacao", default)]
    pub homologation_url: Option<String>,

    /// Production endpoint. Empty or absent when the municipality has none.
    #[serde(rename = "producao", default)]
    pub production_url: Option<String>,

    /// Provider entity id, embedded in the `prestador` tag.
    #[serde(rename = "entidade")]
    pub provider_entity: u32,
}

/// Read-only lookup of municipality metadata by IBGE code.
pub struct MunicipalityRegistry {
    entries: HashMap<String, MunicipalityMetadata>,
}

impl MunicipalityRegistry {
    /// The table bundled with the crate, parsed once per process.
    pub fn bundled() -> &'static Self {
        &BUNDLED
    }

    /// Build a registry from a JSON document mapping codes to metadata.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let entries: HashMap<String, MunicipalityMetadata> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Look up the metadata for a municipality code.
    pub fn resolve(&self, code: &str) -> Result<&MunicipalityMetadata, Error> {
        self.entries
            .get(code)
            .ok_or_else(|| Error::UnknownMunicipality(code.to_string()))
    }

    /// Iterate over the registered municipality codes.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered municipalities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
