//! Create `customer` table.
//!
//! Column widths match the field limits enforced at the HTTP boundary.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(string_len(Customer::FirstName, 100).not_null())
                    .col(string_len(Customer::LastName, 100).not_null())
                    .col(string_len(Customer::LegalName, 150).not_null())
                    .col(string_len(Customer::TaxId, 20).not_null())
                    .col(date(Customer::BirthDate).not_null())
                    .col(string_len(Customer::MobilePhone, 30).not_null())
                    .col(string_len(Customer::Email, 150).not_null())
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    FirstName,
    LastName,
    LegalName,
    TaxId,
    BirthDate,
    MobilePhone,
    Email,
    CreatedAt,
    UpdatedAt,
}
