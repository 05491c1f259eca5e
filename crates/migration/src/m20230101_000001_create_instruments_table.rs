use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Instruments::Table)
                    .col(
                        ColumnDef::new(Instruments::InstrumentPid)
                            .string_len(100)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Instruments::ApiUrl).text().not_null())
                    .col(ColumnDef::new(Instruments::CalendarName).text().not_null())
                    .col(ColumnDef::new(Instruments::CalendarUrl).text().not_null())
                    .col(ColumnDef::new(Instruments::Location).string_len(100).not_null())
                    .col(ColumnDef::new(Instruments::SchemaName).text().not_null())
                    .col(ColumnDef::new(Instruments::PropertyTag).string_len(20).not_null())
                    .col(ColumnDef::new(Instruments::FilestorePath).text().not_null())
                    .col(
                        ColumnDef::new(Instruments::ComputerName)
                            .string_len(100)
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Instruments::ComputerIp).string_len(15))
                    .col(ColumnDef::new(Instruments::ComputerMount).text())
                    .col(ColumnDef::new(Instruments::Harvester).string_len(50).not_null())
                    .col(ColumnDef::new(Instruments::Timezone).string_len(50).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Instruments::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum Instruments {
    Table,
    InstrumentPid,
    ApiUrl,
    CalendarName,
    CalendarUrl,
    Location,
    SchemaName,
    PropertyTag,
    FilestorePath,
    ComputerName,
    ComputerIp,
    ComputerMount,
    Harvester,
    Timezone,
}
