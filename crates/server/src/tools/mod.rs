//! MCP tool implementations.
//!
//! This module contains all tools exposed by the cep-cache MCP server.

pub mod cep_lookup;

pub use cep_lookup::{CepLookupParams, lookup_impl};
