//! rsiam-storage: Concurrent in-memory policy store
//!
//! A single readers-writer lock guards the three shared maps (policies,
//! groups, custom roles) and the compat-mode flag, so every decision
//! observes one consistent snapshot of all of them. Writes replace whole
//! entries; there is no persistence and no partial update.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                rsiam-storage                 │
//! ├─────────────────────────────────────────────┤
//! │  memory  - PolicyStore (RwLock'd maps)      │
//! │  etag    - Canonical policy fingerprints    │
//! │  error   - StorageError                     │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod etag;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use memory::PolicyStore;
