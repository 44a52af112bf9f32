// db/models/performance_metrics_index.rs
use chrono::Local;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait};
use serde::Serialize;

/// Largest index number handed out before the counter wraps back to 1.
pub const MAX_INDEX_NO: i32 = 20000;

/// `YYYYMMDDHHMM`, minute resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// One pull cycle. Rows are append-only; the newest row by `id` holds the
/// current index number.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "performance_metrics_index")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub index_no: i32,
    pub timestamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Current local wall-clock time in [`TIMESTAMP_FORMAT`].
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Successor of `previous` on the ring `1..=MAX_INDEX_NO`.
pub fn next_index_no(previous: Option<i32>) -> i32 {
    match previous {
        Some(prev) if (1..MAX_INDEX_NO).contains(&prev) => prev + 1,
        _ => 1,
    }
}

impl Model {
    /// Most recently created row, by creation order rather than numeric value.
    pub async fn latest<C>(db: &C) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find().order_by_desc(Column::Id).one(db).await
    }

    /// Appends the next index number with `timestamp` and returns the new row.
    ///
    /// The read of the previous row and the insert share one transaction, and
    /// the read takes a row lock on backends that support it, so two writers
    /// cannot both derive their number from the same predecessor. Every call
    /// advances the counter.
    pub async fn allocate_next(db: &DatabaseConnection, timestamp: &str) -> Result<Model, DbErr> {
        let txn = db.begin().await?;

        let previous = Entity::find()
            .order_by_desc(Column::Id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let index_no = next_index_no(previous.map(|p| p.index_no));

        let created = ActiveModel {
            index_no: Set(index_no),
            timestamp: Set(timestamp.to_owned()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }
}
