//! Utility functions

pub mod time;

pub use time::{Clock, ManualClock, SystemClock, format_duration};
