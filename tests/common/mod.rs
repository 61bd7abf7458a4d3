//! Shared test utilities for sqm-bot integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Each harness compiles its own copy, so not every helper
//! is used everywhere.
#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod builders;
pub mod fake_sheets_api;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fakes::*;
pub use fixtures::*;
