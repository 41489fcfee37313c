//! Domain layer for the AMap client
//!
//! Vendor-independent value objects shared by the integration crate:
//! coordinates and their wire format, the closed flag enums accepted by the
//! web service, and the route identifiers naming each endpoint family.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
