use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202410010001_create_performance_metrics_index::Migration),
            Box::new(migrations::m202410010002_create_performance_metrics_data::Migration),
        ]
    }
}
