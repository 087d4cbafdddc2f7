use serde::Deserialize;
use std::{fs, io, path::PathBuf};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SensorConfig {
    /// Local file path or `http(s)://` URL of the JSON document.
    pub location: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_unit")]
    pub unit: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub bind_addr: String,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
    #[serde(default = "default_x_label")]
    pub x_label: String,
    /// TTF font used for axis text. When unset a common system font is looked up.
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub chart: ChartConfig,
    pub metrics: Option<MetricsConfig>,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

fn default_kind() -> String {
    "PV".to_string()
}

fn default_unit() -> String {
    "mW".to_string()
}

fn default_chart_width() -> u32 {
    600
}

fn default_chart_height() -> u32 {
    400
}

fn default_x_label() -> String {
    "Time".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            width: default_chart_width(),
            height: default_chart_height(),
            x_label: default_x_label(),
            font_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let sensors = ["10.json", "11.json", "12.json"]
            .into_iter()
            .map(|location| SensorConfig {
                location: location.to_string(),
                kind: default_kind(),
                unit: default_unit(),
            })
            .collect();

        Self {
            api: ApiConfig {
                bind_addr: "0.0.0.0:8080".to_string(),
            },
            chart: ChartConfig::default(),
            metrics: None,
            sensors,
        }
    }
}

impl AppConfig {
    /// Reads `$SENSOR_CONFIG` (default `sensor-config.toml`), falling back to
    /// the built-in sensor list when the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("SENSOR_CONFIG").unwrap_or_else(|_| "sensor-config.toml".to_string());
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path, "config file not found, using built-in defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(anyhow::anyhow!("failed to read config {path}: {e}")),
        };

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}
