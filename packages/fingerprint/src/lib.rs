//! # Blockcast fingerprints
//!
//! A fingerprint is a SHA-256 digest over the canonical serialization of a
//! Source's semantic fields (`content`, `name`, `category`, `variables`,
//! `toggles`, `documentationLinks`). Re-saving a Source without a semantic
//! change yields the same fingerprint, which is what staleness checks compare.

pub mod error;
pub mod fingerprint;
pub mod source;

pub use error::{FingerprintError, FingerprintResult};
pub use fingerprint::{
    compute_content_fingerprint, fingerprint_projection, fingerprint_value, refresh_content_hash,
    PROJECTION_FIELDS,
};
pub use source::{DocumentationLink, SourceRecord, Toggle, Variable};
