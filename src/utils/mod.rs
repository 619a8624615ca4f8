//! Utility functions shared by the library and its demos.

mod logger;

pub use logger::setup_logger;
