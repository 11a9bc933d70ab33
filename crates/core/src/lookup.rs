//! Cache-through CEP lookup.
//!
//! ### Algorithm
//! 1. Validate the raw input. Invalid input fails before any I/O.
//! 2. Read the store. A hit is returned as-is: no write, no network.
//! 3. On a miss, call the provider once. Transport failures and the
//!    provider's "not found" flag both fail without persisting anything.
//! 4. Normalize the provider payload, upsert it and return the stored row.
//!
//! There is no TTL and no reconciliation: a stored record is trusted over
//! the provider for as long as it exists.

use std::sync::Arc;

use crate::address::{AddressRecord, NewAddress};
use crate::cache::AddressStore;
use crate::cep::{Cep, validate};
use crate::error::LookupError;
use crate::provider::{PostalLookup, ProviderAddress, ProviderReply};

/// The lookup orchestrator.
///
/// Holds no per-request state; clones share the same store and provider.
#[derive(Clone)]
pub struct CepLookup {
    store: Arc<dyn AddressStore>,
    provider: Arc<dyn PostalLookup>,
}

impl CepLookup {
    pub fn new(store: Arc<dyn AddressStore>, provider: Arc<dyn PostalLookup>) -> Self {
        Self { store, provider }
    }

    /// Resolve a raw CEP string to an address.
    pub async fn lookup(&self, raw: &str) -> Result<AddressRecord, LookupError> {
        let cep = validate(raw)?;

        if let Some(record) = self.store.get(&cep).await? {
            tracing::debug!(cep = %cep, "cache hit");
            return Ok(record);
        }

        tracing::debug!(cep = %cep, "cache miss, querying provider");

        let found = match self.provider.fetch(&cep).await {
            Ok(ProviderReply::Found(address)) => address,
            Ok(ProviderReply::NotFound) => {
                tracing::debug!(cep = %cep, "provider reports CEP not found");
                return Err(LookupError::NotFound(cep.to_string()));
            }
            Err(e) => {
                tracing::warn!(cep = %cep, error = %e, "provider call failed");
                return Err(e.into());
            }
        };

        let address = normalize(&cep, found)?;
        let record = self.store.upsert(&address).await?;

        tracing::info!(cep = %record.cep, address = %record, "cached new address");

        Ok(record)
    }
}

/// Turn a provider payload into a record ready for upsert.
///
/// The record is keyed by the provider's CEP with separators stripped. An
/// empty complement becomes `None`.
pub fn normalize(requested: &Cep, address: ProviderAddress) -> Result<NewAddress, LookupError> {
    let cep = Cep::from_provider(&address.cep)
        .map_err(|e| LookupError::Internal(format!("provider returned an unusable CEP: {e}")))?;

    if &cep != requested {
        tracing::warn!(requested = %requested, returned = %cep, "provider answered for a different CEP");
    }

    Ok(NewAddress {
        cep,
        street: address.street,
        complement: address.complement.filter(|c| !c.trim().is_empty()),
        neighborhood: address.neighborhood,
        city: address.city,
        state_code: address.state_code,
    })
}
