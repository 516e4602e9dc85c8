//! Integration tests for the public codec API.
//!
//! These tests play several schema releases against one snapshot store
//! and check what survives each upgrade. Unit tests in crates/*/src cover
//! the encoder, decoders and stores in isolation.

#[path = "../common/mod.rs"]
mod common;

mod coercion;
mod corruption;
mod persistence;
mod schema_evolution;
