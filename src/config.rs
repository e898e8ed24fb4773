//! Service configuration supplied by the caller.
//!
//! The configuration travels as a JSON blob using the short field names of
//! the NFSe service family (`cmun`, `im`, `cnpj`, `tpamb`).

use crate::error::Error;
use serde::Deserialize;
use std::fmt;

/// Caller-supplied service configuration, read-only for the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// IBGE municipality code.
    #[serde(rename = "cmun")]
    pub municipality_code: String,

    /// Municipal registration of the service provider.
    #[serde(rename = "im")]
    pub municipal_registration: String,

    /// Taxpayer id (CNPJ) of the service provider.
    #[serde(rename = "cnpj")]
    pub cnpj: String,

    /// Environment flag: `1` selects production, anything else homologation.
    #[serde(rename = "tpamb")]
    pub environment_flag: u8,
}

impl ServiceConfig {
    /// Parse the configuration from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Environment derived from the `tpamb` flag.
    pub fn environment(&self) -> Environment {
        Environment::from_flag(self.environment_flag)
    }
}

/// Target webservice environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Homologation,
    Production,
}

impl Environment {
    /// Map the numeric `tpamb` flag. Only `1` means production.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 1 {
            Environment::Production
        } else {
            Environment::Homologation
        }
    }

    /// Environment name as the service family spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Homologation => "homologacao",
            Environment::Production => "producao",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
