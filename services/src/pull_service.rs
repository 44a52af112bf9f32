use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::MetricsError;
use crate::index_service::IndexService;
use crate::ingest_service::{IngestResult, IngestService};
use crate::rna_client::RnaClient;

/// Runs allocate → fetch → ingest as one operation.
///
/// Clones share the same writer lock, so pulls started from the HTTP route and
/// from the scheduler in one process never overlap.
#[derive(Clone, Debug)]
pub struct PullService {
    client: RnaClient,
    writer: Arc<Mutex<()>>,
}

impl PullService {
    pub fn new(client: RnaClient) -> Self {
        Self {
            client,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// One full pull cycle.
    ///
    /// The index number is allocated before the fetch and stays consumed when
    /// the fetch fails.
    pub async fn pull(&self, db: &DatabaseConnection) -> Result<IngestResult, MetricsError> {
        let _writer = self.writer.lock().await;

        let allocated = IndexService::allocate_next(db).await?;
        tracing::info!(
            index_no = allocated.index_no,
            "pulling performance metrics from RNA"
        );

        let payload = match self.client.fetch().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(index_no = allocated.index_no, "pull aborted: {e}");
                return Err(e);
            }
        };

        IngestService::ingest(db, allocated.index_no, &allocated.timestamp, payload).await
    }

    /// Pulls every `every`, starting immediately. Failures are logged and the
    /// loop keeps going.
    pub fn spawn_scheduler(self, db: DatabaseConnection, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match self.pull(&db).await {
                    Ok(result) => tracing::info!(
                        index_no = result.index_no,
                        records = result.records,
                        "scheduled pull finished"
                    ),
                    Err(e) => tracing::error!("scheduled pull failed: {e}"),
                }
            }
        })
    }
}
