use std::collections::HashMap;
use std::collections::hash_map::Entry;

use db::models::performance_metrics_data::{Model as MetricModel, NewMetricRecord};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;

use crate::error::MetricsError;
use crate::payload::{InvalidIndicatorValue, Measurements, MetricsPayload};

/// Outcome of one ingest, returned to the caller of a pull.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IngestResult {
    pub index_no: i32,
    pub timestamp: String,
    pub records: u64,
    pub replaced: u64,
}

/// Flattens `payload` into one record per (device, object) pair.
///
/// A pair that appears twice keeps the slot of its first appearance and the
/// values of its last.
pub fn build_records(
    payload: &MetricsPayload,
    timestamp: &str,
) -> Result<Vec<NewMetricRecord>, InvalidIndicatorValue> {
    let mut records: Vec<NewMetricRecord> = Vec::new();
    let mut slots: HashMap<(String, String), usize> = HashMap::new();

    for device in payload.devices() {
        for object in &device.objects {
            let m = Measurements::from_indicators(&object.indicators)?;
            let record = NewMetricRecord {
                device_id: device.id.clone(),
                device_name: device.name.clone(),
                object_id: object.id.clone(),
                object_name: object.name.clone(),
                loss_percentage: m.loss_percentage,
                jitter: m.jitter,
                latency: m.latency,
                timestamp: timestamp.to_owned(),
            };

            match slots.entry((device.id.clone(), object.id.clone())) {
                Entry::Occupied(slot) => records[*slot.get()] = record,
                Entry::Vacant(slot) => {
                    slot.insert(records.len());
                    records.push(record);
                }
            }
        }
    }

    Ok(records)
}

pub struct IngestService;

impl IngestService {
    /// Replaces every stored row for `index_no` with the rows derived from
    /// `payload`.
    ///
    /// A payload that does not match the expected shape fails before anything
    /// is touched. Otherwise the clear and the inserts commit together or not
    /// at all.
    pub async fn ingest(
        db: &DatabaseConnection,
        index_no: i32,
        timestamp: &str,
        payload: Value,
    ) -> Result<IngestResult, MetricsError> {
        let payload = MetricsPayload::from_value(payload)
            .map_err(|e| MetricsError::IngestFailure(format!("Malformed metrics payload: {e}")))?;

        let records = build_records(&payload, timestamp)
            .map_err(|e| MetricsError::IngestFailure(format!("Malformed metrics payload: {e}")))?;
        let summary = MetricModel::replace_index(db, index_no, records)
            .await
            .map_err(MetricsError::from_ingest)?;

        tracing::info!(
            index_no,
            inserted = summary.inserted,
            replaced = summary.deleted,
            "performance metrics stored"
        );

        Ok(IngestResult {
            index_no,
            timestamp: timestamp.to_owned(),
            records: summary.inserted,
            replaced: summary.deleted,
        })
    }
}
