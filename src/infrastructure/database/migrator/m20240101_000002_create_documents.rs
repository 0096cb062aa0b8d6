//! Create documents table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Documents::TenantId).string_len(100).not_null())
                    .col(ColumnDef::new(Documents::Name).string_len(255).null())
                    .col(ColumnDef::new(Documents::ContentType).string_len(100).null())
                    .col(ColumnDef::new(Documents::SizeBytes).big_integer().null())
                    .col(ColumnDef::new(Documents::UploadedBy).string().null())
                    .col(
                        ColumnDef::new(Documents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_tenant_id")
                    .table(Documents::Table)
                    .col(Documents::TenantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Documents {
    Table,
    Id,
    TenantId,
    Name,
    ContentType,
    SizeBytes,
    UploadedBy,
    CreatedAt,
}
