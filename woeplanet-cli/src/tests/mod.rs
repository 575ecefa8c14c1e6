//! Shared test harness modules for the woeplanet CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod execution;
mod helpers;
mod unit;
