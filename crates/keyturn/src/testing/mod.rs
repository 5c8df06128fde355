//! Test doubles for the collaborator seams
//!
//! Used by this crate's own tests and available to embedders wiring the
//! engine into their own test harnesses.
mod mocks;

pub use mocks::{MockDirectory, MockVault, SecretVersion};
