use db::models::performance_metrics_data::Model as MetricModel;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::error::MetricsError;

/// Most rows a single export returns.
pub const EXPORT_ROW_LIMIT: u64 = 20000;

pub const CSV_HEADER: [&str; 9] = [
    "Index",
    "Device ID",
    "Device Name",
    "Object ID",
    "Object Name",
    "Loss Percentage",
    "Jitter",
    "Latency",
    "Timestamp",
];

#[derive(Clone, Debug, PartialEq)]
pub struct CsvDocument {
    pub filename: String,
    pub body: String,
    pub rows: usize,
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

fn float_field(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_default()
}

/// Shortest round-trip digits, positional for exponents in `-4..16` and
/// `1.5e+16` / `1e-07` style outside that range.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let sign = if v.is_sign_negative() { "-" } else { "" };
    let sci = format!("{:e}", v.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (-4..16).contains(&exp) {
        if exp < 0 {
            format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
        } else {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                format!("{digits}{}.0", "0".repeat(int_len - digits.len()))
            } else {
                format!("{}.{}", &digits[..int_len], &digits[int_len..])
            }
        }
    } else {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{exp_sign}{:02}", exp.abs())
    };

    format!("{sign}{body}")
}

fn push_row(out: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// Renders `rows` in the given order below the fixed header. Absent numbers
/// become empty fields.
pub fn render_csv(rows: &[MetricModel]) -> String {
    let mut out = String::new();
    let header: Vec<String> = CSV_HEADER.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header);

    for r in rows {
        push_row(
            &mut out,
            &[
                r.index_no.map(|i| i.to_string()).unwrap_or_default(),
                r.device_id.clone(),
                r.device_name.clone(),
                r.object_id.clone(),
                r.object_name.clone(),
                float_field(r.loss_percentage),
                float_field(r.jitter),
                float_field(r.latency),
                r.timestamp.clone(),
            ],
        );
    }

    out
}

pub struct ExportService;

impl ExportService {
    /// Newest rows for `device_id` as CSV, at most [`EXPORT_ROW_LIMIT`].
    ///
    /// The rows are read inside a transaction so a concurrent replace of an
    /// index number is seen either entirely or not at all.
    pub async fn export_csv(
        db: &DatabaseConnection,
        device_id: &str,
    ) -> Result<CsvDocument, MetricsError> {
        let txn = db.begin().await?;
        let rows = MetricModel::latest_for_device(&txn, device_id, EXPORT_ROW_LIMIT).await?;
        txn.commit().await?;

        if rows.is_empty() {
            return Err(MetricsError::NotFound(device_id.to_owned()));
        }

        tracing::debug!(device_id, rows = rows.len(), "exporting performance metrics");
        Ok(CsvDocument {
            filename: format!("performance_metrics_{device_id}.csv"),
            body: render_csv(&rows),
            rows: rows.len(),
        })
    }
}
