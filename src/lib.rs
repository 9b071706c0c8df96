//! Bootlag - systemd service activation timing over SSH
//!
//! Connects to a remote host, reads per-service activation timestamps from
//! systemd and classifies each service as activated during boot or after
//! userspace boot completed. The analysis itself only depends on the
//! [`remote::RemoteExecutor`] trait, so it can run against any transport.

pub mod analyzer;
pub mod boot;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod json_output;
pub mod keys;
pub mod model;
pub mod remote;
pub mod ssh;
pub mod stats;
pub mod text_output;
pub mod timing;

pub use error::{AnalyzerError, Result};
