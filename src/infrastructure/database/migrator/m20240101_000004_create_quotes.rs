//! Create quotes table migration

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quotes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Quotes::UserId).string().not_null())
                    .col(ColumnDef::new(Quotes::Subject).string_len(255).not_null())
                    .col(ColumnDef::new(Quotes::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Quotes::Description).text().null())
                    .col(
                        ColumnDef::new(Quotes::Status)
                            .string_len(20)
                            .not_null()
                            .default("in afwachting"),
                    )
                    .col(
                        ColumnDef::new(Quotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Quotes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_user_id")
                            .from(Quotes::Table, Quotes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_user_id")
                    .table(Quotes::Table)
                    .col(Quotes::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Quotes {
    Table,
    Id,
    UserId,
    Subject,
    AmountCents,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}
