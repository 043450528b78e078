//! # tessera-evm-tests
//!
//! JSON fixture runner for the Tessera EVM.
//!
//! This crate provides:
//! - JSON parsing for program fixtures
//! - A runner that executes each fixture and checks the outcome
//! - Directory walking and result aggregation
//!
//! ## Fixture format
//!
//! A file maps test names to cases. Each case holds an optional `env`
//! (block and transaction context), the `exec` inputs (code, gas, value,
//! calldata, caller) and an `expect` block. Only the expectations present
//! in `expect` are checked.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod types;
mod runner;

pub use error::{TestError, TestResult};
pub use types::*;
pub use vm_test::{VmTestResults, VmTestRunner};
pub use runner::{TestRunner, TestStats};
