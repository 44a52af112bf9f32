// migrations/m202410010001_create_performance_metrics_index.rs
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PerformanceMetricsIndex {
    Table,
    Id,
    IndexNo,
    Timestamp,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202410010001_create_performance_metrics_index"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PerformanceMetricsIndex::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PerformanceMetricsIndex::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PerformanceMetricsIndex::IndexNo)
                            .integer()
                            .not_null(),
                    )
                    // YYYYMMDDHHMM
                    .col(
                        ColumnDef::new(PerformanceMetricsIndex::Timestamp)
                            .string_len(12)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PerformanceMetricsIndex::Table).to_owned())
            .await
    }
}
