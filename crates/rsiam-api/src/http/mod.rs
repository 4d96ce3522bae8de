//! HTTP transport: router, handlers, and principal extraction.

mod principal;
mod routes;
mod state;

pub use principal::{extract_principal, PRINCIPAL_HEADER};
pub use routes::{create_router, ApiError};
pub use state::AppState;

#[cfg(test)]
mod tests;
