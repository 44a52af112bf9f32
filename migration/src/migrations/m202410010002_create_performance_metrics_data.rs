// migrations/m202410010002_create_performance_metrics_data.rs
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PerformanceMetricsData {
    Table,
    Id,
    IndexNo,
    DeviceId,
    DeviceName,
    ObjectId,
    ObjectName,
    LossPercentage,
    Jitter,
    Latency,
    Timestamp,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202410010002_create_performance_metrics_data"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PerformanceMetricsData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PerformanceMetricsData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PerformanceMetricsData::IndexNo).integer().null())
                    .col(
                        ColumnDef::new(PerformanceMetricsData::DeviceId)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PerformanceMetricsData::DeviceName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PerformanceMetricsData::ObjectId)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PerformanceMetricsData::ObjectName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceMetricsData::LossPercentage).double().null())
                    .col(ColumnDef::new(PerformanceMetricsData::Jitter).double().null())
                    .col(ColumnDef::new(PerformanceMetricsData::Latency).double().null())
                    .col(
                        ColumnDef::new(PerformanceMetricsData::Timestamp)
                            .string_len(12)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_metrics_data_index_no")
                    .table(PerformanceMetricsData::Table)
                    .col(PerformanceMetricsData::IndexNo)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_metrics_data_device_id")
                    .table(PerformanceMetricsData::Table)
                    .col(PerformanceMetricsData::DeviceId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PerformanceMetricsData::Table).to_owned())
            .await
    }
}
