//! Wire response shapes.
//!
//! Field names and messages match the public API contract byte for byte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::AddressRecord;

pub const INVALID_CEP_MESSAGE: &str = "CEP inválido. Deve conter 8 dígitos numéricos.";
pub const NOT_FOUND_MESSAGE: &str = "CEP não encontrado.";
pub const UPSTREAM_ERROR_MESSAGE: &str = "Erro ao consultar o serviço dos Correios.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Ocorreu um erro interno no servidor.";

/// Serialized address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireResponse {
    pub cep: String,
    pub logradouro: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    pub data_atualizacao: DateTime<Utc>,
    pub dados_historicos: Option<String>,
}

/// Body of every non-200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// Map a record to its wire shape.
pub fn format(record: AddressRecord) -> WireResponse {
    WireResponse {
        cep: record.cep.into(),
        logradouro: record.street,
        complemento: record.complement,
        bairro: record.neighborhood,
        localidade: record.city,
        uf: record.state_code,
        data_atualizacao: record.last_updated,
        dados_historicos: record.historical_notes,
    }
}

impl From<AddressRecord> for WireResponse {
    fn from(record: AddressRecord) -> Self {
        format(record)
    }
}
