//! rsiam-server: configuration and seed loading.
//!
//! Two concerns live here, both consumed by the `rsiam` binary:
//!
//! - [`config`]: server settings, loaded from defaults, a YAML file, and
//!   `RSIAM_`-prefixed environment overrides.
//! - [`seed`]: the policy seed document (projects, groups, roles), flattened
//!   into the canonical resource keys the store loads at startup.

pub mod config;
pub mod seed;

pub use config::{ConfigLoadError, ServerConfig};
pub use seed::SeedDocument;
