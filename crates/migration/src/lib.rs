//! Migrator for the customer schema.
//! Unique indexes are applied after the table exists.
pub use sea_orm_migration::prelude::*;

mod m20241121_000001_create_customer;
mod m20241121_000002_add_customer_indexes;

pub use m20241121_000002_add_customer_indexes::{UQ_CUSTOMER_EMAIL, UQ_CUSTOMER_TAX_ID};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241121_000001_create_customer::Migration),
            // Indexes should always be applied last
            Box::new(m20241121_000002_add_customer_indexes::Migration),
        ]
    }
}
