pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

pub mod entities;
mod m20251018_000001_create_urls;
mod m20251018_000002_create_users;
mod m20251018_000003_create_refresh_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251018_000001_create_urls::Migration),
            Box::new(m20251018_000002_create_users::Migration),
            Box::new(m20251018_000003_create_refresh_tokens::Migration),
        ]
    }
}

/// Length of `refresh_tokens.token`
///
/// utf8mb4 下 512 字符的唯一索引仍在 InnoDB 3072 字节限制内。
pub const REFRESH_TOKEN_MAX_LEN: u32 = 512;

/// 非空时间戳列
///
/// MySQL 的 TIMESTAMP 默认只保留到秒，这里显式使用微秒精度。
pub(crate) fn timestamp_column<T: IntoIden>(backend: DatabaseBackend, column: T) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    if backend == DatabaseBackend::MySql {
        def.custom(Alias::new("TIMESTAMP(6)"));
    } else {
        def.timestamp_with_time_zone();
    }
    def.not_null();
    def
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(backend: DatabaseBackend) -> String {
        let table = Table::create()
            .table(Alias::new("t"))
            .col(timestamp_column(backend, Alias::new("created_at")))
            .to_owned();
        backend.build(&table).to_string()
    }

    #[test]
    fn test_mysql_timestamps_keep_fractional_seconds() {
        let sql = render(DatabaseBackend::MySql);
        assert!(sql.contains("TIMESTAMP(6)"), "{sql}");
        assert!(sql.contains("NOT NULL"), "{sql}");
    }

    #[test]
    fn test_other_backends_use_timestamp_with_time_zone() {
        let sql = render(DatabaseBackend::Postgres);
        assert!(sql.contains("timestamp with time zone"), "{sql}");
    }
}
