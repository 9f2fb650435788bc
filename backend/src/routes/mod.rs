/// Router Module Index
///
/// Splits the gateway's routes by whether page access control applies to them.

/// Health check, JSON helpers, backend passthrough and static assets. No access layer.
pub mod public;

/// Portal pages. Wrapped in the role-based access layer as a whole.
pub mod portal;
