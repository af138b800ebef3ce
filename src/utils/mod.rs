pub mod logger;

pub use logger::{DataLogger, LogSchedule};
