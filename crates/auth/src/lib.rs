//! `storefront-auth` — stateless authentication boundary.
//!
//! Verifies bearer tokens and exposes the caller identity (user id, display
//! name, roles) the catalog needs for product ownership and review
//! submission. Intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::{JwtClaims, TokenError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use roles::Role;
