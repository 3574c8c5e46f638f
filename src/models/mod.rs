//! Data models representing database entities and API payloads.
//!
//! Catalog endpoints mostly return column-keyed records straight from the
//! query helper; the types here cover request bodies, typed rows used by the
//! transactional services, and response bodies with a fixed shape.

/// Order lifecycle, placement and totals
pub mod order;
/// Adoption request/response and pet rows
pub mod pet;
/// Product listing filters and shopping cart payloads
pub mod product;
/// User accounts, login and profile payloads
pub mod user;
/// Veterinarian directory filters and services
pub mod vet;
