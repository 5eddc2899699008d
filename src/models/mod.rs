//! Data models for the FYERS login flow.
//!
//! - [`primitives`] - Identifiers and the typed values passed between login steps
//! - [`profile`] - Account profile returned by the API

pub mod primitives;
pub mod profile;

pub use primitives::*;
pub use profile::*;
