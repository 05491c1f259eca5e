use db::session_log::RecordStatus;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionLog::Table)
                    .col(
                        ColumnDef::new(SessionLog::IdSessionLog)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SessionLog::SessionIdentifier)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionLog::Instrument)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionLog::Timestamp)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(SessionLog::EventType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionLog::RecordStatus)
                            .string_len(32)
                            .not_null()
                            .default(RecordStatus::WaitingForEnd),
                    )
                    .col(ColumnDef::new(SessionLog::User).string_len(50))
                    .col(
                        ColumnDef::new(SessionLog::SessionNote)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SessionLog::Table, SessionLog::Instrument)
                            .to(crate::Instruments::Table, crate::Instruments::InstrumentPid)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_session_log_instrument_timestamp")
                    .table(SessionLog::Table)
                    .col(SessionLog::Instrument)
                    .col(SessionLog::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionLog::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum SessionLog {
    Table,
    IdSessionLog,
    SessionIdentifier,
    Instrument,
    Timestamp,
    EventType,
    RecordStatus,
    User,
    SessionNote,
}
