use sensor_model::domain::{RawRecord, Sensor};
use serde::Serialize;
use serde_json::{Number, Value};

pub const NO_RECORDINGS_ERROR: &str = "No recordings data available for this sensor.";

/// JSON body served for one sensor.
///
/// `total_records` counts every stored record, including ones dropped from
/// `timestamps`/`values`, and `last_record` is the raw final record whether or
/// not it is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPayload {
    pub timestamps: Vec<String>,
    /// Source numbers, untouched (integers stay integers).
    pub values: Vec<Number>,
    pub pes_id: Option<Value>,
    pub unit: String,
    pub total_records: usize,
    pub last_record: Option<RawRecord>,
    pub last_timestamp: Option<Value>,
    pub last_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn format_for_api(sensor: &Sensor) -> ViewPayload {
    let readings = super::readings(sensor);

    let last_record = sensor.last_record().cloned();
    let last_field = |idx: usize| last_record.as_ref().and_then(|r| r.field(idx)).cloned();

    ViewPayload {
        timestamps: readings.iter().map(|r| r.timestamp.to_string()).collect(),
        values: readings.iter().map(|r| r.number.clone()).collect(),
        pes_id: sensor.identifier().cloned(),
        unit: sensor.unit().to_string(),
        total_records: sensor.record_count(),
        last_timestamp: last_field(1),
        last_value: last_field(2),
        last_record,
        error: sensor.is_empty().then(|| NO_RECORDINGS_ERROR.to_string()),
    }
}
