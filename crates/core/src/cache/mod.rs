//! SQLite-backed cache of resolved addresses.
//!
//! This module provides a persistent cache keyed by CEP using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Idempotent upserts that never clear historical notes

pub mod addresses;
pub mod connection;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;

use crate::address::{AddressRecord, NewAddress};
use crate::cep::Cep;

/// Address store trait.
///
/// Get and upsert must each be atomic per key. Two concurrent upserts for
/// the same CEP are allowed to race; the last one wins.
#[async_trait::async_trait]
pub trait AddressStore: Send + Sync {
    /// Fetch the record for `cep`, or `None` if it was never resolved.
    async fn get(&self, cep: &Cep) -> Result<Option<AddressRecord>, Error>;

    /// Insert or refresh the record for `address.cep`, stamping `last_updated`.
    ///
    /// Returns the record as stored after the write.
    async fn upsert(&self, address: &NewAddress) -> Result<AddressRecord, Error>;
}
