use anyhow::Result;
use sensor_service::{
    config::AppConfig,
    http::{self, chart::ChartState},
    metrics_server,
    observability,
    registry::SensorRegistry,
    render::PlottersRenderer,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr).await?;
    }

    // Sensors are loaded once; they are read-only from here on.
    let client = reqwest::Client::new();
    let registry = Arc::new(SensorRegistry::load(&cfg.sensors, &client).await);

    let renderer = PlottersRenderer::new(&cfg.chart)?;

    let api_app = http::api::router(registry.clone());
    let chart_app = http::chart::router(ChartState {
        registry,
        renderer: Arc::new(renderer),
    });

    // Run both servers concurrently
    tokio::try_join!(
        http::serve("api", &cfg.api.bind_addr, api_app),
        http::serve("chart", &cfg.chart.bind_addr, chart_app),
    )?;

    Ok(())
}
