//! ViaCEP response types and normalization.

use cep_core::{ProviderAddress, ProviderReply};
use serde::Deserialize;

use super::ViaCepError;

/// Raw response from `GET /ws/{cep}/json/`.
///
/// Extra fields (`ibge`, `gia`, `ddd`, `siafi`, ...) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ViaCepPayload {
    #[serde(default)]
    pub erro: Option<ErroFlag>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub complemento: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
}

/// The "not found" indicator. ViaCEP has shipped it both as a JSON boolean
/// and as the string `"true"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErroFlag {
    Bool(bool),
    Text(String),
}

impl ErroFlag {
    pub fn is_set(&self) -> bool {
        match self {
            ErroFlag::Bool(b) => *b,
            ErroFlag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

impl ViaCepPayload {
    pub fn is_not_found(&self) -> bool {
        self.erro.as_ref().is_some_and(ErroFlag::is_set)
    }

    /// Convert into a provider reply.
    ///
    /// `cep`, `localidade` and `uf` must be non-empty. `logradouro` and
    /// `bairro` must be present but may be empty: single-CEP municipalities
    /// have no street or neighborhood.
    pub fn into_reply(self) -> Result<ProviderReply, ViaCepError> {
        if self.is_not_found() {
            return Ok(ProviderReply::NotFound);
        }

        let cep = required(self.cep, "cep")?;
        let city = required(self.localidade, "localidade")?;
        let state_code = required(self.uf, "uf")?;
        let street = self.logradouro.ok_or_else(|| missing("logradouro"))?;
        let neighborhood = self.bairro.ok_or_else(|| missing("bairro"))?;

        Ok(ProviderReply::Found(ProviderAddress {
            cep,
            street,
            complement: self.complemento,
            neighborhood,
            city,
            state_code,
        }))
    }
}

fn missing(field: &str) -> ViaCepError {
    ViaCepError::Parse(format!("missing field `{field}`"))
}

fn required(value: Option<String>, field: &str) -> Result<String, ViaCepError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(ViaCepError::Parse(format!("empty field `{field}`"))),
        None => Err(missing(field)),
    }
}
