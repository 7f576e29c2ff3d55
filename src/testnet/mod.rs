//! Helpers for building chains in unit tests

pub mod test_utils;

pub use test_utils::*;
