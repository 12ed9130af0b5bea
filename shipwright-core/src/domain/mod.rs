//! Core domain types
//!
//! Build-side types are produced by this system; workflow-side types are
//! read-only views of what the remote CI system reports.

pub mod build;
pub mod workflow;
