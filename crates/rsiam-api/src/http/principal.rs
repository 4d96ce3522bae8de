//! Principal extraction from the transport's metadata carrier.

use axum::http::HeaderMap;

/// Header carrying the caller's principal. Missing or empty means "no
/// principal": the decision engine then runs its legacy path that skips
/// member matching.
pub const PRINCIPAL_HEADER: &str = "x-emulator-principal";

/// Reads the principal from the request headers.
pub fn extract_principal(headers: &HeaderMap) -> String {
    headers
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .trim()
        .to_string()
}
