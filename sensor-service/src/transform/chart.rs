use sensor_model::domain::Sensor;
use time::macros::format_description;

/// Index-aligned chart input: display labels and values of the valid readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn chart_series(sensor: &Sensor) -> ChartSeries {
    let display = format_description!("[year]-[month]-[day] [hour]:[minute]");

    let mut series = ChartSeries::default();
    for reading in super::readings(sensor) {
        let label = reading
            .at
            .format(display)
            .unwrap_or_else(|_| reading.timestamp.to_string());
        series.labels.push(label);
        series.values.push(reading.value);
    }
    series
}
