//! Client code for cep-cache.
//!
//! This crate provides the ViaCEP HTTP client that implements the
//! `PostalLookup` seam of the core lookup orchestrator.

pub mod viacep;

pub use viacep::{ViaCepClient, ViaCepConfig, ViaCepError, ViaCepPayload};
