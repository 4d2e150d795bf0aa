//! Configuration for the almanac library and command line tool.

mod settings;

pub use settings::{CalendarConfig, Config, LoggingConfig};
