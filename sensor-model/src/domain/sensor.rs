use serde_json::Value;

use super::record::RawRecord;

/// A sensor and the readings loaded for it at startup.
///
/// Records are stored oldest first. The sensor never changes after it is built.
#[derive(Debug, Clone)]
pub struct Sensor {
    location: String,
    kind: String,
    unit: String,
    records: Vec<RawRecord>,
    identifier: Option<Value>,
}

impl Sensor {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        unit: impl Into<String>,
        records: Vec<RawRecord>,
    ) -> Self {
        // PES id comes from the first field of the oldest record.
        let identifier = records.first().and_then(|r| r.field(0)).cloned();

        Self {
            location: location.into(),
            kind: kind.into(),
            unit: unit.into(),
            records,
            identifier,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn identifier(&self) -> Option<&Value> {
        self.identifier.as_ref()
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn last_record(&self) -> Option<&RawRecord> {
        self.records.last()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identifier_comes_from_first_record() {
        let sensor = Sensor::new(
            "10.json",
            "PV",
            "mW",
            vec![
                RawRecord::new(json!([5, "2024-01-01T09:00:00Z", 10.0])),
                RawRecord::new(json!([6, "2024-01-02T10:00:00Z", 12.5])),
            ],
        );

        assert_eq!(sensor.record_count(), 2);
        assert_eq!(sensor.identifier(), Some(&json!(5)));
        assert_eq!(sensor.last_record(), Some(&RawRecord::new(json!([6, "2024-01-02T10:00:00Z", 12.5]))));
        assert_eq!(sensor.kind(), "PV");
        assert_eq!(sensor.unit(), "mW");
    }

    #[test]
    fn empty_sensor_has_no_identifier() {
        let sensor = Sensor::new("missing.json", "PV", "mW", Vec::new());
        assert!(sensor.is_empty());
        assert_eq!(sensor.record_count(), 0);
        assert!(sensor.identifier().is_none());
        assert!(sensor.last_record().is_none());
    }

    #[test]
    fn empty_first_record_has_no_identifier() {
        let sensor = Sensor::new(
            "10.json",
            "PV",
            "mW",
            vec![
                RawRecord::new(json!([])),
                RawRecord::new(json!([5, "2024-01-01T09:00:00Z", 10.0])),
            ],
        );
        assert!(sensor.identifier().is_none());
        assert_eq!(sensor.record_count(), 2);
    }
}
