//! Release binary installer library.
//!
//! This crate turns "repository + release tag" into "binary on disk". The
//! release's download URLs are matched against ranked rules to pick one
//! asset and derive the binary's name; the asset is then downloaded and
//! unwrapped from its compression and archive layers by content sniffing.
//! It backs the `release-install` CLI binary and can be driven
//! programmatically with custom sources and sinks.
//!
//! # Modules
//!
//! - [`artifact`] - Candidate assets and the byte buffers passed between stages
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Optional TOML configuration
//! - [`error`] - Top-level error type
//! - [`extraction`] - Content sniffing and the unwrap loop
//! - [`install_flow`] - Find and install orchestration
//! - [`logging`] - `env_logger` setup
//! - [`output`] - User-facing stderr messages and the confirmation prompt
//! - [`release`] - Release tags
//! - [`repository`] - Repository references
//! - [`rule`] - URL rules, priority ranking and selection
//! - [`sink`] - Writing the binary to disk
//! - [`source`] - Listing and downloading release assets
//! - [`template`] - Name and URL templates

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod install_flow;
pub mod logging;
pub mod output;
pub mod release;
pub mod repository;
pub mod rule;
pub mod sink;
pub mod source;
pub mod template;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
