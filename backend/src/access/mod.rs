/// Route Access Module Index
///
/// The static half of access control: which paths exist, and which role may see which.
/// The per-request half lives in `crate::middleware`.

/// Pure path matching against exact and prefix-wildcard patterns.
pub mod matcher;

/// Role to allowed-pattern mapping, validated once at startup.
pub mod table;

pub use matcher::{PUBLIC_ROUTES, path_matches};
pub use table::{RouteTable, RouteTableError, standard_entries};
