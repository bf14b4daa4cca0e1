#![forbid(unsafe_code)]

pub mod dataset;
pub mod grader;
pub mod model;
pub mod time;

pub use dataset::{DatasetFilter, RosterError};
pub use grader::Grader;
pub use time::Clock;
