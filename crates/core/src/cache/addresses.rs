//! Address CRUD operations.
//!
//! Rows are keyed by the canonical CEP. Writes go through
//! `INSERT ... ON CONFLICT DO UPDATE`, which SQLite applies atomically per
//! row, so concurrent upserts for one CEP resolve to last-write-wins.

use chrono::{DateTime, SecondsFormat, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::AddressStore;
use super::connection::CacheDb;
use crate::Error;
use crate::address::{AddressRecord, NewAddress};
use crate::cep::Cep;

const SELECT_ADDRESS: &str = "SELECT
    cep, logradouro, complemento, bairro, localidade, uf, data_atualizacao, dados_historicos
FROM addresses WHERE cep = ?1";

/// Raw column values, before timestamp and CEP parsing.
struct AddressRow {
    cep: String,
    street: String,
    complement: Option<String>,
    neighborhood: String,
    city: String,
    state_code: String,
    last_updated: String,
    historical_notes: Option<String>,
}

impl AddressRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            cep: row.get(0)?,
            street: row.get(1)?,
            complement: row.get(2)?,
            neighborhood: row.get(3)?,
            city: row.get(4)?,
            state_code: row.get(5)?,
            last_updated: row.get(6)?,
            historical_notes: row.get(7)?,
        })
    }
}

impl TryFrom<AddressRow> for AddressRecord {
    type Error = Error;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        let last_updated = DateTime::parse_from_rfc3339(&row.last_updated)
            .map_err(|e| Error::InvalidRecord { cep: row.cep.clone(), reason: e.to_string() })?
            .with_timezone(&Utc);
        let cep = crate::cep::validate(&row.cep)
            .map_err(|e| Error::InvalidRecord { cep: row.cep.clone(), reason: e.to_string() })?;

        Ok(AddressRecord {
            cep,
            street: row.street,
            complement: row.complement,
            neighborhood: row.neighborhood,
            city: row.city,
            state_code: row.state_code,
            last_updated,
            historical_notes: row.historical_notes,
        })
    }
}

fn select_address(conn: &rusqlite::Connection, cep: &str) -> Result<Option<AddressRow>, Error> {
    match conn.query_row(SELECT_ADDRESS, params![cep], AddressRow::from_row) {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl CacheDb {
    /// Get an address by CEP.
    ///
    /// Returns None if the CEP has never been resolved.
    pub async fn get_address(&self, cep: &Cep) -> Result<Option<AddressRecord>, Error> {
        let cep = cep.as_str().to_string();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<AddressRow>, Error> { select_address(conn, &cep) })
            .await
            .map_err(Error::from)?;

        row.map(AddressRecord::try_from).transpose()
    }

    /// Insert or update an address, stamping `data_atualizacao` with the
    /// current time.
    ///
    /// `dados_historicos` is left untouched on conflict.
    pub async fn upsert_address(&self, address: &NewAddress) -> Result<AddressRecord, Error> {
        let address = address.clone();
        let cep = address.cep.clone();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let row = self
            .conn
            .call(move |conn| -> Result<Option<AddressRow>, Error> {
                conn.execute(
                    "INSERT INTO addresses (
                    cep, logradouro, complemento, bairro, localidade, uf, data_atualizacao
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(cep) DO UPDATE SET
                    logradouro = excluded.logradouro,
                    complemento = excluded.complemento,
                    bairro = excluded.bairro,
                    localidade = excluded.localidade,
                    uf = excluded.uf,
                    data_atualizacao = excluded.data_atualizacao",
                    params![
                        address.cep.as_str(),
                        &address.street,
                        &address.complement,
                        &address.neighborhood,
                        &address.city,
                        &address.state_code,
                        &now,
                    ],
                )?;
                select_address(conn, address.cep.as_str())
            })
            .await
            .map_err(Error::from)?;

        let row = row
            .ok_or_else(|| Error::InvalidRecord { cep: cep.to_string(), reason: "missing after upsert".into() })?;
        AddressRecord::try_from(row)
    }

    /// Set or clear the historical notes of an existing address.
    ///
    /// This is the write path of the enrichment process; lookups never call
    /// it. Returns false if no address exists for `cep`.
    pub async fn set_historical_notes(&self, cep: &Cep, notes: Option<&str>) -> Result<bool, Error> {
        let cep = cep.as_str().to_string();
        let notes = notes.map(str::to_string);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let updated =
                    conn.execute("UPDATE addresses SET dados_historicos = ?1 WHERE cep = ?2", params![notes, cep])?;
                Ok(updated > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached addresses.
    pub async fn count_addresses(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM addresses", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl AddressStore for CacheDb {
    async fn get(&self, cep: &Cep) -> Result<Option<AddressRecord>, Error> {
        self.get_address(cep).await
    }

    async fn upsert(&self, address: &NewAddress) -> Result<AddressRecord, Error> {
        self.upsert_address(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cep::validate;

    fn make_test_address(cep: &str) -> NewAddress {
        NewAddress {
            cep: validate(cep).unwrap(),
            street: "Rua do Banco".to_string(),
            complement: None,
            neighborhood: "Bairro do Banco".to_string(),
            city: "Cidade do Banco".to_string(),
            state_code: "BB".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let address = make_test_address("12345678");

        let stored = db.upsert_address(&address).await.unwrap();
        assert_eq!(stored.street, "Rua do Banco");
        assert!(stored.historical_notes.is_none());

        let retrieved = db.get_address(&address.cep).await.unwrap().unwrap();
        assert_eq!(retrieved, stored);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.get_address(&validate("00000000").unwrap()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_complement_null_roundtrip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let mut address = make_test_address("12345678");
        db.upsert_address(&address).await.unwrap();
        assert!(db.get_address(&address.cep).await.unwrap().unwrap().complement.is_none());

        address.complement = Some("Casa".into());
        db.upsert_address(&address).await.unwrap();
        let stored = db.get_address(&address.cep).await.unwrap().unwrap();
        assert_eq!(stored.complement.as_deref(), Some("Casa"));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let address = make_test_address("12345678");

        let first = db.upsert_address(&address).await.unwrap();
        let second = db.upsert_address(&address).await.unwrap();

        assert_eq!(db.count_addresses().await.unwrap(), 1);
        assert!(second.last_updated >= first.last_updated);
        assert_eq!(second.street, first.street);
    }

    #[tokio::test]
    async fn test_upsert_preserves_historical_notes() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let address = make_test_address("12345678");
        db.upsert_address(&address).await.unwrap();

        assert!(db.set_historical_notes(&address.cep, Some("Info do banco.")).await.unwrap());

        let refreshed = db.upsert_address(&address).await.unwrap();
        assert_eq!(refreshed.historical_notes.as_deref(), Some("Info do banco."));
    }

    #[tokio::test]
    async fn test_set_historical_notes_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let updated = db
            .set_historical_notes(&validate("87654321").unwrap(), Some("nada"))
            .await
            .unwrap();
        assert!(!updated);
        assert_eq!(db.count_addresses().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_same_cep() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let address = make_test_address("87654321");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                let address = address.clone();
                tokio::spawn(async move { db.upsert_address(&address).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(db.count_addresses().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_reported() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO addresses (cep, logradouro, bairro, localidade, uf, data_atualizacao)
                     VALUES ('11111111', 'Rua', 'Bairro', 'Cidade', 'UF', 'yesterday')",
                    [],
                )
            })
            .await
            .unwrap();

        let result = db.get_address(&validate("11111111").unwrap()).await;
        assert!(matches!(result, Err(Error::InvalidRecord { .. })));
    }

    #[tokio::test]
    async fn test_store_trait_delegates() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let store: &dyn AddressStore = &db;
        let address = make_test_address("12345678");

        assert!(store.get(&address.cep).await.unwrap().is_none());
        store.upsert(&address).await.unwrap();
        assert!(store.get(&address.cep).await.unwrap().is_some());
    }
}
