//! Report delivery to the remote collection sink.
//!
//! This module provides:
//! - Credential artifact loading (the only fatal startup dependency)
//! - The [`ReportSink`] seam with one append operation
//! - An HTTP implementation with bounded per-attempt timeouts

mod client;
mod credentials;

pub use client::{HttpSink, ReportSink};
pub use credentials::SinkCredentials;
