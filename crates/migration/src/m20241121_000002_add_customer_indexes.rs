use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Index names are matched by the storage layer to tell which field a
// duplicate-key error refers to.
pub const UQ_CUSTOMER_TAX_ID: &str = "uq_customer_tax_id";
pub const UQ_CUSTOMER_EMAIL: &str = "uq_customer_email";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(UQ_CUSTOMER_TAX_ID)
                    .table(Customer::Table)
                    .col(Customer::TaxId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(UQ_CUSTOMER_EMAIL)
                    .table(Customer::Table)
                    .col(Customer::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // listing is ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_created_at")
                    .table(Customer::Table)
                    .col(Customer::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(UQ_CUSTOMER_TAX_ID).table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(UQ_CUSTOMER_EMAIL).table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_customer_created_at").table(Customer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, TaxId, Email, CreatedAt }
