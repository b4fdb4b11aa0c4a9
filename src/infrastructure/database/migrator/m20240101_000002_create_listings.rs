//! Create listings table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Listings::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Listings::ListingType).string_len(10).not_null())
                    .col(ColumnDef::new(Listings::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Listings::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Listings::Brand).string_len(100).null())
                    .col(ColumnDef::new(Listings::Model).string_len(100).null())
                    .col(ColumnDef::new(Listings::Year).integer().null())
                    .col(ColumnDef::new(Listings::MileageKm).integer().null())
                    .col(ColumnDef::new(Listings::OperatingHours).integer().null())
                    .col(ColumnDef::new(Listings::FuelType).string_len(50).null())
                    .col(ColumnDef::new(Listings::Transmission).string_len(50).null())
                    .col(ColumnDef::new(Listings::Color).string_len(50).null())
                    .col(ColumnDef::new(Listings::PowerHp).integer().null())
                    .col(ColumnDef::new(Listings::LengthCm).integer().null())
                    .col(ColumnDef::new(Listings::Description).text().null())
                    .col(
                        ColumnDef::new(Listings::Status)
                            .string_len(20)
                            .not_null()
                            .default("beschikbaar"),
                    )
                    .col(
                        ColumnDef::new(Listings::Images)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Listings::Videos)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_type_status")
                    .table(Listings::Table)
                    .col(Listings::ListingType)
                    .col(Listings::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Listings {
    Table,
    Id,
    ListingType,
    Name,
    PriceCents,
    Brand,
    Model,
    Year,
    MileageKm,
    OperatingHours,
    FuelType,
    Transmission,
    Color,
    PowerHp,
    LengthCm,
    Description,
    Status,
    Images,
    Videos,
    CreatedAt,
    UpdatedAt,
}
