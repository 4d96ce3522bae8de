//! rsiam-api: HTTP/JSON front for the IAM policy emulator.
//!
//! The transport is a thin adapter over the core contract in
//! `rsiam-storage`: it extracts the caller's principal from the
//! `X-Emulator-Principal` header, maps Google-style RPC paths
//! (`/v1/{resource}:{method}`) onto the store's operations, and translates
//! validation failures into the RPC error JSON shape.

pub mod http;
pub mod observability;

pub use http::{create_router, AppState};
