//! # runexport-common
//!
//! Shared error definitions, output format selection, and constants used
//! across the runexport workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate.

pub mod config;
pub mod constants;
pub mod error;
