pub mod chart;
pub mod view;

pub use chart::{chart_series, ChartSeries};
pub use view::{format_for_api, ViewPayload, NO_RECORDINGS_ERROR};

use sensor_model::domain::{RawRecord, Reading, Sensor, SkipReason};
use serde_json::Value;
use time::{macros::format_description, PrimitiveDateTime};

/// Pure validation of a raw record.
///
/// Rules, checked in order:
/// - at least 3 fields;
/// - field[1] is a string and field[2] a JSON number (booleans do not count);
/// - field[1] matches `YYYY-MM-DDTHH:MM:SSZ`.
pub fn validate_record(record: &RawRecord) -> Result<Reading<'_>, SkipReason> {
    let fields = record.fields();
    if fields.len() < 3 {
        return Err(SkipReason::TooFewFields);
    }

    let (Some(timestamp), Value::Number(number)) = (fields[1].as_str(), &fields[2]) else {
        return Err(SkipReason::UnexpectedType);
    };
    let Some(value) = number.as_f64() else {
        return Err(SkipReason::UnexpectedType);
    };

    let at = PrimitiveDateTime::parse(
        timestamp,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"),
    )
    .map_err(|_| SkipReason::InvalidTimestamp)?;

    Ok(Reading {
        timestamp,
        at,
        number,
        value,
    })
}

/// Valid readings of a sensor in stored order. Skipped records are logged and counted.
pub fn readings(sensor: &Sensor) -> Vec<Reading<'_>> {
    let mut out = Vec::with_capacity(sensor.record_count());

    for (index, record) in sensor.records().iter().enumerate() {
        match validate_record(record) {
            Ok(reading) => out.push(reading),
            Err(reason) => {
                metrics::counter!("sensor_records_skipped_total", "reason" => reason.as_str())
                    .increment(1);
                tracing::debug!(
                    location = sensor.location(),
                    index,
                    reason = reason.as_str(),
                    "skipping record"
                );
            }
        }
    }

    out
}

/// Positions (in stored order) of the records that fail validation, with the reason.
pub fn skipped_records(sensor: &Sensor) -> Vec<(usize, SkipReason)> {
    sensor
        .records()
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| validate_record(record).err().map(|reason| (idx, reason)))
        .collect()
}
