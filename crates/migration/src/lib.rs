pub use sea_orm_migration::prelude::*;

mod m20230101_000001_create_instruments_table;
mod m20230101_000002_create_session_log_table;

pub(crate) use m20230101_000001_create_instruments_table::Instruments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230101_000001_create_instruments_table::Migration),
            Box::new(m20230101_000002_create_session_log_table::Migration),
        ]
    }
}
