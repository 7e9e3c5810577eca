/*!
    Base infrastructure for running tests against a bootstrapped
    environment.
*/

use lazy_static::lazy_static;
use std::sync::Mutex;
use tracing::info;

use crate::bootstrap::environment::bootstrap_environment;
use crate::bootstrap::init::init_test;
use crate::chain::exec::{Launcher, SystemLauncher};
use crate::error::Error;
use crate::framework::session::TestSession;
use crate::types::config::TestConfig;
use crate::types::env::write_env;

lazy_static! {
    // The relay ports and the regtest data directory are shared by every
    // session in the process, so only one session may be alive at a time.
    static ref SESSION_LOCK: Mutex<()> = Mutex::new(());
}

/**
   Runs a test case implementing [`EnvironmentTest`] against the real
   binaries configured through the environment variables.
*/
pub fn run_environment_test<Test: EnvironmentTest>(test: &Test) -> Result<(), Error> {
    let config = init_test()?;

    run_environment_test_with(test, &config, SystemLauncher)
}

/**
   Runs a test case implementing [`EnvironmentTest`] with the given
   configuration and launcher.

   The environment is torn down after the test returns, whatever the
   outcome, and the test result is returned unchanged.

   Tests run on parallel threads by default. Calls are serialized so that
   each test gets its own session from bootstrap to teardown, and never
   sees the daemon stopped by another test.
*/
pub fn run_environment_test_with<Test, L>(
    test: &Test,
    config: &TestConfig,
    launcher: L,
) -> Result<(), Error>
where
    Test: EnvironmentTest,
    L: Launcher,
{
    // A panicking test poisons the lock after its session was torn down
    // on unwind, so the lock is still good to use.
    let _guard = SESSION_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    info!("starting test with test config: {:?}", config);

    let mut session = bootstrap_environment(config, launcher)?;

    if let Some(path) = &config.env_export_path {
        write_env(path, &session)?;
        info!("written test environment variables to {}", path.display());
    }

    let result = test.run(config, &session);

    session.teardown();

    result
}

/**
   A test that runs once the environment has reached the
   [`Ready`](crate::bootstrap::environment::BootstrapStage::Ready) stage.
*/
pub trait EnvironmentTest {
    /// Test runner
    fn run<L: Launcher>(
        &self,
        config: &TestConfig,
        session: &TestSession<L>,
    ) -> Result<(), Error>;
}
