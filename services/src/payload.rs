//! Typed view of the RNA metrics response.
//!
//! ```json
//! { "result": { "devices": [ { "id": "d1", "name": "DevA", "objects": [
//!     { "id": "o1", "name": "ObjA", "indicators": [ { "name": "latency", "value": 10.2 } ] }
//! ] } ] } }
//! ```
//!
//! Missing `result`, `devices`, `objects` or `indicators` read as empty. Ids
//! may arrive as strings or numbers. Indicator names and values are kept raw
//! until extraction: only the three stored indicators have their value read,
//! as a number, a numeric string or `null`.

use serde::Deserialize;
use serde::de::{self, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsPayload {
    #[serde(default)]
    pub result: PayloadResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadResult {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub objects: Vec<MonitoredObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoredObject {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicator {
    #[serde(default, deserialize_with = "indicator_kind")]
    pub name: IndicatorKind,
    #[serde(default)]
    pub value: Value,
}

/// Indicator names the service stores. Anything else, including a missing or
/// non-string name, is kept as `Unknown` and skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorKind {
    LossPercentage,
    Jitter,
    Latency,
    Unknown(String),
}

impl Default for IndicatorKind {
    fn default() -> Self {
        IndicatorKind::Unknown(String::new())
    }
}

impl From<String> for IndicatorKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "loss_percentage" => IndicatorKind::LossPercentage,
            "jitter" => IndicatorKind::Jitter,
            "latency" => IndicatorKind::Latency,
            _ => IndicatorKind::Unknown(name),
        }
    }
}

/// A stored indicator carried a value that is not a number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("indicator {name} value {value} is not numeric")]
pub struct InvalidIndicatorValue {
    pub name: &'static str,
    pub value: Value,
}

/// The three measurements of one monitored object.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub loss_percentage: Option<f64>,
    pub jitter: Option<f64>,
    pub latency: Option<f64>,
}

impl Measurements {
    /// Scans `indicators` in order. A repeated name overwrites the earlier
    /// value, including with `None`. Values of unknown indicators are never
    /// inspected.
    pub fn from_indicators(indicators: &[Indicator]) -> Result<Self, InvalidIndicatorValue> {
        let mut out = Measurements::default();
        for indicator in indicators {
            let (slot, name) = match indicator.name {
                IndicatorKind::LossPercentage => (&mut out.loss_percentage, "loss_percentage"),
                IndicatorKind::Jitter => (&mut out.jitter, "jitter"),
                IndicatorKind::Latency => (&mut out.latency, "latency"),
                IndicatorKind::Unknown(_) => continue,
            };
            *slot = numeric_value(&indicator.value).ok_or_else(|| InvalidIndicatorValue {
                name,
                value: indicator.value.clone(),
            })?;
        }
        Ok(out)
    }
}

/// `Some(None)` for `null`, `Some(Some(v))` for a number or numeric string,
/// `None` for anything else.
fn numeric_value(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().map(Some),
        Value::String(s) => s.trim().parse::<f64>().ok().map(Some),
        _ => None,
    }
}

impl MetricsPayload {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn devices(&self) -> &[Device] {
        &self.result.devices
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn indicator_kind<'de, D>(deserializer: D) -> Result<IndicatorKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => IndicatorKind::from(s),
        Value::Null => IndicatorKind::default(),
        other => IndicatorKind::Unknown(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn indicators(value: Value) -> Vec<Indicator> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_latency_stays_absent() {
        let m = Measurements::from_indicators(&indicators(json!([
            { "name": "loss_percentage", "value": 1.5 },
            { "name": "jitter", "value": 2.0 }
        ])))
        .unwrap();

        assert_eq!(
            m,
            Measurements {
                loss_percentage: Some(1.5),
                jitter: Some(2.0),
                latency: None,
            }
        );
    }

    #[test]
    fn unknown_indicators_are_ignored() {
        let list = indicators(json!([
            { "name": "mos", "value": 4.3 },
            { "name": "latency", "value": 12 }
        ]));

        assert_eq!(list[0].name, IndicatorKind::Unknown("mos".into()));
        let m = Measurements::from_indicators(&list).unwrap();
        assert_eq!(m.latency, Some(12.0));
        assert_eq!(m.loss_percentage, None);
    }

    #[test]
    fn repeated_indicator_is_last_write_wins() {
        let m = Measurements::from_indicators(&indicators(json!([
            { "name": "jitter", "value": 1.0 },
            { "name": "jitter", "value": 3.5 },
            { "name": "latency", "value": 8.0 },
            { "name": "latency", "value": null }
        ])))
        .unwrap();

        assert_eq!(m.jitter, Some(3.5));
        assert_eq!(m.latency, None);
    }

    #[test]
    fn values_accept_numeric_strings_and_missing_value() {
        let m = Measurements::from_indicators(&indicators(json!([
            { "name": "loss_percentage", "value": "0.25" },
            { "name": "jitter" }
        ])))
        .unwrap();

        assert_eq!(m.loss_percentage, Some(0.25));
        assert_eq!(m.jitter, None);
    }

    #[test]
    fn non_numeric_value_of_stored_indicator_is_rejected() {
        let err = Measurements::from_indicators(&indicators(json!([
            { "name": "latency", "value": "fast" }
        ])))
        .unwrap_err();

        assert_eq!(err.name, "latency");
        assert_eq!(err.value, json!("fast"));
    }

    #[test]
    fn unknown_indicator_values_are_never_parsed() {
        let list = indicators(json!([
            { "name": "status", "value": "up" },
            { "name": "tags", "value": ["a", "b"] },
            { "name": "latency", "value": 10.2 }
        ]));

        let m = Measurements::from_indicators(&list).unwrap();
        assert_eq!(m.latency, Some(10.2));
        assert_eq!(m.jitter, None);
    }

    #[test]
    fn nameless_indicators_are_unknown() {
        let list = indicators(json!([
            { "value": 3.0 },
            { "name": null, "value": 4.0 },
            { "name": 7, "value": 5.0 },
            { "name": "latency", "value": 10.2 }
        ]));

        assert_eq!(list[0].name, IndicatorKind::Unknown(String::new()));
        assert_eq!(list[1].name, IndicatorKind::Unknown(String::new()));
        assert_eq!(list[2].name, IndicatorKind::Unknown("7".into()));

        let m = Measurements::from_indicators(&list).unwrap();
        assert_eq!(
            m,
            Measurements {
                loss_percentage: None,
                jitter: None,
                latency: Some(10.2),
            }
        );
    }

    #[test]
    fn missing_sections_read_as_empty() {
        assert!(MetricsPayload::from_value(json!({})).unwrap().devices().is_empty());
        assert!(
            MetricsPayload::from_value(json!({ "result": {} }))
                .unwrap()
                .devices()
                .is_empty()
        );

        let payload = MetricsPayload::from_value(json!({
            "result": { "devices": [ { "id": 17, "name": "Edge" } ] }
        }))
        .unwrap();
        assert_eq!(payload.devices()[0].id, "17");
        assert!(payload.devices()[0].objects.is_empty());
    }

    #[test]
    fn device_without_id_is_rejected() {
        let parsed = MetricsPayload::from_value(json!({
            "result": { "devices": [ { "name": "NoId" } ] }
        }));
        assert!(parsed.is_err());
    }
}
