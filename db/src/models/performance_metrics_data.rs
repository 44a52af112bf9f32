// db/models/performance_metrics_data.rs
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait};
use serde::Serialize;

/// Rows per INSERT statement. Nine bound columns per row keeps a chunk under
/// SQLite's 999-parameter limit on older builds.
const INSERT_CHUNK_SIZE: usize = 100;

/// One (device, object) observation for an index number.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "performance_metrics_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub index_no: Option<i32>,
    pub device_id: String,
    pub device_name: String,
    pub object_id: String,
    pub object_name: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub loss_percentage: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub jitter: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub latency: Option<f64>,
    pub timestamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A row waiting to be written. The index number is supplied by
/// [`Model::replace_index`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewMetricRecord {
    pub device_id: String,
    pub device_name: String,
    pub object_id: String,
    pub object_name: String,
    pub loss_percentage: Option<f64>,
    pub jitter: Option<f64>,
    pub latency: Option<f64>,
    pub timestamp: String,
}

impl NewMetricRecord {
    fn into_active_model(self, index_no: i32) -> ActiveModel {
        ActiveModel {
            index_no: Set(Some(index_no)),
            device_id: Set(self.device_id),
            device_name: Set(self.device_name),
            object_id: Set(self.object_id),
            object_name: Set(self.object_name),
            loss_percentage: Set(self.loss_percentage),
            jitter: Set(self.jitter),
            latency: Set(self.latency),
            timestamp: Set(self.timestamp),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub deleted: u64,
    pub inserted: u64,
}

impl Model {
    /// Swaps every row tagged `index_no` for `records`.
    ///
    /// The delete and all inserts run in one transaction: on any error the
    /// transaction is dropped without commit and the previous rows survive.
    pub async fn replace_index(
        db: &DatabaseConnection,
        index_no: i32,
        records: Vec<NewMetricRecord>,
    ) -> Result<ReplaceSummary, DbErr> {
        let txn = db.begin().await?;

        let deleted = Entity::delete_many()
            .filter(Column::IndexNo.eq(index_no))
            .exec(&txn)
            .await?
            .rows_affected;

        let inserted = records.len() as u64;
        let mut pending = records.into_iter().peekable();
        while pending.peek().is_some() {
            let chunk: Vec<ActiveModel> = pending
                .by_ref()
                .take(INSERT_CHUNK_SIZE)
                .map(|r| r.into_active_model(index_no))
                .collect();
            Entity::insert_many(chunk).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(ReplaceSummary { deleted, inserted })
    }

    /// Newest rows for `device_id` first, at most `limit` of them.
    pub async fn latest_for_device<C>(
        db: &C,
        device_id: &str,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::DeviceId.eq(device_id))
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    /// Rows for `index_no` in insertion order.
    pub async fn find_by_index<C>(db: &C, index_no: i32) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::IndexNo.eq(index_no))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
