pub mod instrument;
pub mod session_log;

pub use sea_orm::{
    sea_query, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, Database,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
pub use time::{OffsetDateTime, PrimitiveDateTime};
