//! CEP syntax validation.
//!
//! A [`Cep`] is always exactly eight ASCII digits with no separators. The
//! only ways to build one are [`validate`] for caller input and
//! [`Cep::from_provider`] for codes echoed back by the upstream provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of digits in a canonical CEP.
pub const CEP_LEN: usize = 8;

/// Separators the provider may place inside a CEP (e.g. `87654-321`).
const SEPARATORS: &[char] = &['-', '.', ' '];

/// A validated, canonical 8-digit CEP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

/// The input is not a syntactically valid CEP.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 8 numeric digits, got {input:?}")]
pub struct InvalidFormat {
    input: String,
}

impl InvalidFormat {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }

    /// The offending input, as received.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Validate caller input as a CEP.
///
/// Surrounding whitespace is trimmed. Anything that is not exactly eight
/// ASCII digits afterwards is rejected.
pub fn validate(input: &str) -> Result<Cep, InvalidFormat> {
    let trimmed = input.trim();

    if trimmed.len() != CEP_LEN || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidFormat::new(input));
    }

    Ok(Cep(trimmed.to_string()))
}

impl Cep {
    /// Canonicalize a CEP returned by the provider by stripping separators.
    pub fn from_provider(raw: &str) -> Result<Self, InvalidFormat> {
        let stripped: String = raw.trim().chars().filter(|c| !SEPARATORS.contains(c)).collect();
        validate(&stripped).map_err(|_| InvalidFormat::new(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Cep {
    type Error = InvalidFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)
    }
}

impl From<Cep> for String {
    fn from(cep: Cep) -> Self {
        cep.0
    }
}
