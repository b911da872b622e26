//! Service layer for the customer registry.
//! - Validates wire payloads into customer inputs.
//! - Enforces tax id / email uniqueness on top of a pluggable store.
//! - Maps storage failures into [`errors::ServiceError`].

pub mod errors;
pub mod customer;
#[cfg(test)]
pub mod test_support;
