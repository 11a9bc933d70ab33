//! The upstream postal lookup seam.
//!
//! Implementations wrap a single network call. They classify failures but
//! never retry and never touch the cache.

use crate::cep::Cep;

/// Address fields as the provider returned them, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAddress {
    /// CEP as echoed by the provider, possibly with separators.
    pub cep: String,
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state_code: String,
}

/// A successful provider answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderReply {
    Found(ProviderAddress),
    /// The provider's own "not found" flag was set.
    NotFound,
}

/// Provider call failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Timeout, connection failure or non-success status.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The call succeeded but the body did not have the expected shape.
    #[error("malformed provider payload: {0}")]
    Malformed(String),
}

/// Postal lookup client trait.
#[async_trait::async_trait]
pub trait PostalLookup: Send + Sync {
    /// Resolve a CEP against the upstream provider.
    async fn fetch(&self, cep: &Cep) -> Result<ProviderReply, ProviderError>;
}
