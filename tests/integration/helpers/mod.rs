//! Helper utilities for integration tests.


pub use record_generator::*;
