//! Core types and shared functionality for cep-cache.
//!
//! This crate provides:
//! - CEP validation and the address data model
//! - The cache-through lookup orchestrator
//! - Cache implementation with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod address;
pub mod cache;
pub mod cep;
pub mod config;
pub mod error;
pub mod lookup;
pub mod provider;
pub mod response;

pub use address::{AddressRecord, NewAddress};
pub use cache::{AddressStore, CacheDb};
pub use cep::{Cep, InvalidFormat, validate};
pub use config::{AppConfig, ConfigError, Transport};
pub use error::{Error, LookupError};
pub use lookup::CepLookup;
pub use provider::{PostalLookup, ProviderAddress, ProviderError, ProviderReply};
pub use response::{ErrorResponse, WireResponse};
