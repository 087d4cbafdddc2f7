pub mod record;
pub mod sensor;

pub use record::{RawRecord, Reading, SkipReason};
pub use sensor::Sensor;
