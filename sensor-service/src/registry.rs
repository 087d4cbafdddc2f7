use futures::future::join_all;
use sensor_model::domain::Sensor;

use crate::{config::SensorConfig, sources};

/// Loads one sensor. Load failures leave the sensor empty instead of failing.
pub async fn load_sensor(cfg: &SensorConfig, client: &reqwest::Client) -> Sensor {
    let records = sources::load(&cfg.location, client).await;
    let sensor = Sensor::new(&cfg.location, &cfg.kind, &cfg.unit, records);

    if sensor.is_empty() {
        tracing::warn!(location = %cfg.location, "no recordings loaded, PES id will be empty");
    } else if sensor.identifier().is_none() {
        tracing::warn!(location = %cfg.location, "could not determine PES id from first record");
    }

    sensor
}

/// Sensors loaded at startup, addressed by their position in the configuration.
#[derive(Debug, Default)]
pub struct SensorRegistry {
    sensors: Vec<Sensor>,
}

impl SensorRegistry {
    pub fn new(sensors: Vec<Sensor>) -> Self {
        Self { sensors }
    }

    /// Loads every configured sensor concurrently, keeping configuration order.
    pub async fn load(configs: &[SensorConfig], client: &reqwest::Client) -> Self {
        let sensors = join_all(configs.iter().map(|cfg| load_sensor(cfg, client))).await;

        tracing::info!(
            sensors = sensors.len(),
            empty = sensors.iter().filter(|s| s.is_empty()).count(),
            "sensor registry ready"
        );

        Self { sensors }
    }

    /// Bounds-checked lookup; negative or too-large indices are `None`.
    pub fn get(&self, index: i64) -> Option<&Sensor> {
        usize::try_from(index).ok().and_then(|i| self.sensors.get(i))
    }

    /// Lookup from a raw path segment. Anything that is not an index that fits
    /// the registry (including integers beyond `i64`) is `None`.
    pub fn lookup(&self, raw_index: &str) -> Option<&Sensor> {
        raw_index.parse::<i64>().ok().and_then(|i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.iter()
    }
}
