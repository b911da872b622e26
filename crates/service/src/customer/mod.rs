//! Customer registry: domain types, field rules, storage and business service.

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::CustomerService;
