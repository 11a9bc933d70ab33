//! Address data model.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::cep::Cep;

/// One CEP's resolved address, as held by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub cep: Cep,
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state_code: String,
    /// Set by the store on every write.
    pub last_updated: DateTime<Utc>,
    /// Filled in by an out-of-band enrichment process, never by a lookup.
    pub historical_notes: Option<String>,
}

/// A normalized provider result, ready to be upserted.
///
/// Carries neither a timestamp nor historical notes: the store stamps the
/// former and the lookup path never writes the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub cep: Cep,
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state_code: String,
}

impl NewAddress {
    /// Attach the write timestamp, producing the record a fresh insert yields.
    pub fn into_record(self, last_updated: DateTime<Utc>) -> AddressRecord {
        AddressRecord {
            cep: self.cep,
            street: self.street,
            complement: self.complement,
            neighborhood: self.neighborhood,
            city: self.city,
            state_code: self.state_code,
            last_updated,
            historical_notes: None,
        }
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}, {}/{}", self.cep, self.street, self.city, self.state_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cep::validate;

    #[test]
    fn test_display() {
        let record = NewAddress {
            cep: validate("01001000").unwrap(),
            street: "Praça da Sé".into(),
            complement: Some("lado ímpar".into()),
            neighborhood: "Sé".into(),
            city: "São Paulo".into(),
            state_code: "SP".into(),
        }
        .into_record(Utc::now());

        assert_eq!(record.to_string(), "01001000 - Praça da Sé, São Paulo/SP");
        assert!(record.historical_notes.is_none());
    }
}
