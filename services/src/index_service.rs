use db::models::performance_metrics_index::{self, Model as IndexModel};
use sea_orm::DatabaseConnection;

use crate::error::MetricsError;

pub struct IndexService;

impl IndexService {
    /// Records a new pull cycle stamped with the current local minute and
    /// returns it. Storage errors leave no row behind.
    pub async fn allocate_next(db: &DatabaseConnection) -> Result<IndexModel, MetricsError> {
        let timestamp = performance_metrics_index::current_timestamp();
        let allocated = IndexModel::allocate_next(db, &timestamp).await?;
        tracing::debug!(index_no = allocated.index_no, %timestamp, "allocated index number");
        Ok(allocated)
    }
}
