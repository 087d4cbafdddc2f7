pub mod domain;

pub use domain::{RawRecord, Reading, Sensor, SkipReason};
