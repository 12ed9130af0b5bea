//! Shipwright Core
//!
//! Core types and rules for the Shipwright build gateway.
//!
//! This crate contains:
//! - Domain types: build requests, dispatch results, and the read-only view of
//!   remote workflow runs and artifacts
//! - Validation: request validation and build identifier generation

pub mod domain;
pub mod validation;
