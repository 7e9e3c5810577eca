#![allow(clippy::type_complexity)]
#![doc = include_str!("../README.md")]

//!
//! ## Overview
//!
//! The environment is brought up by [`bootstrap_environment`](bootstrap::environment::bootstrap_environment),
//! which returns a [`TestSession`](framework::session::TestSession) owning
//! everything that was launched:
//!
//! 1. the relay servers, one per configured instance, on consecutive ports,
//! 2. a bitcoind in regtest mode, whose version decides the form of the
//!    `createwallet` call,
//! 3. a legacy wallet funded with two batches of 301 mined blocks.
//!
//! Dropping the session, or calling [`teardown`](framework::session::TestSession::teardown),
//! kills the relay servers and stops bitcoind. Teardown happens once and
//! never fails.
//!
//! Tests written in Rust implement [`EnvironmentTest`](framework::base::EnvironmentTest)
//! and run with [`run_environment_test`](framework::base::run_environment_test):
//!
//! ```rust,no_run
//! use regtest_env::prelude::*;
//!
//! struct WalletIsFunded;
//!
//! impl EnvironmentTest for WalletIsFunded {
//!     fn run<L: Launcher>(&self, _config: &TestConfig, session: &TestSession<L>) -> Result<(), Error> {
//!         assert!(session.is_ready());
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Error> {
//!     run_environment_test(&WalletIsFunded)
//! }
//! ```
//!
//! Test suites in other languages are wrapped with the `regtest-env`
//! binary, which runs the given command inside a session.

pub mod bootstrap;
pub mod chain;
pub mod error;
pub mod framework;
pub mod prelude;
pub mod types;

#[cfg(test)]
mod tests;
