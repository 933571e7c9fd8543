//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `operation_mode`: Operation selection and validation tests
//! - `field_resolution`: Token, repository, and merge method resolution tests

mod helpers;
mod operation_mode;
mod precedence;
