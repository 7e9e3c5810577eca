/*!
   Functions for initializing each test at the beginning of a Rust test
   session.
*/

use std::env;
use std::sync::Once;
use tracing_subscriber::{
    self as ts,
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::Error;
use crate::types::config::TestConfig;

static INIT: Once = Once::new();

/**
   Initialize the test with a global logger and error handlers,
   read the environment variables and return a [`TestConfig`].
*/
pub fn init_test() -> Result<TestConfig, Error> {
    init_logging();

    TestConfig::from_lookup(|key| env::var(key).ok())
}

/**
   Install the `color_eyre` report handler and the global logger, once
   per process. Both are skipped or uncolored when [`no_color_log`] is set.
*/
pub fn init_logging() {
    INIT.call_once(|| {
        let no_color_log = no_color_log();

        if !no_color_log {
            // Fails only if another report handler was installed first.
            let _ = color_eyre::install();
        }
        install_logger(!no_color_log);
    });
}

/// `NO_COLOR_LOG=1` turns off colored logs and error reports.
pub fn no_color_log() -> bool {
    env::var("NO_COLOR_LOG")
        .ok()
        .map(|val| val == "1")
        .unwrap_or(false)
}

/**
   Install the [`tracing_subscriber`] logger handlers so that logs will
   be displayed during test.
*/
pub fn install_logger(with_color: bool) {
    // Use log level INFO by default if RUST_LOG is not set.
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let layer = ts::fmt::layer().with_ansi(with_color);

    // Another subscriber may already be installed, e.g. by `test-log`.
    let _ = ts::registry().with(env_filter).with(layer).try_init();
}
