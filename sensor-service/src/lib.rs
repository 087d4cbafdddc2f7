pub mod config;
pub mod http;
pub mod metrics_server;
pub mod observability;
pub mod registry;
pub mod render;
pub mod sources;
pub mod transform;

pub use registry::SensorRegistry;
pub use transform::{format_for_api, ViewPayload};
