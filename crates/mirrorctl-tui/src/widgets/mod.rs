//! Small rendering helpers shared by screens.

pub mod status_indicator;
pub mod time_fmt;
