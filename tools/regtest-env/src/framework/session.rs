/*!
   The test session, owning everything launched for it and tearing it
   down exactly once.
*/

use itertools::Itertools;
use tracing::{info, warn};

use crate::bootstrap::environment::BootstrapStage;
use crate::bootstrap::wallet::TestWallet;
use crate::chain::cli::daemon::stop_daemon;
use crate::chain::driver::DaemonDriver;
use crate::chain::exec::Launcher;
use crate::chain::version::DaemonVersion;
use crate::types::config::TestConfig;
use crate::types::env::{EnvWriter, ExportEnv};
use crate::types::relay::RelayServer;

/**
   A running test environment: the relay servers, the regtest daemon and
   its funded wallet.

   The session is the only owner of the launched processes. Its
   [`teardown`](TestSession::teardown) kills the relay servers and stops
   the daemon, and runs on drop if it was not called before, so cleanup
   also happens when a test panics or bootstrap fails halfway.
*/
pub struct TestSession<L: Launcher> {
    pub config: TestConfig,

    pub(crate) launcher: L,

    pub(crate) driver: DaemonDriver,

    pub(crate) relays: Vec<RelayServer<L::Process>>,

    pub(crate) version: Option<DaemonVersion>,

    pub(crate) wallet: Option<TestWallet>,

    pub(crate) stage: BootstrapStage,

    /**
       Set once `bitcoind -daemon` succeeded. A failed start most likely
       means another daemon holds the regtest data directory, and that
       daemon must not be stopped by this session.
    */
    pub(crate) daemon_started: bool,

    finalized: bool,
}

impl<L: Launcher> TestSession<L> {
    /// An empty session in the [`Unstarted`](BootstrapStage::Unstarted) stage.
    pub fn new(config: TestConfig, launcher: L) -> Self {
        let driver = DaemonDriver::from_config(&config);

        Self {
            config,
            launcher,
            driver,
            relays: Vec::new(),
            version: None,
            wallet: None,
            stage: BootstrapStage::Unstarted,
            daemon_started: false,
            finalized: false,
        }
    }

    pub fn stage(&self) -> BootstrapStage {
        self.stage
    }

    pub fn is_ready(&self) -> bool {
        self.stage == BootstrapStage::Ready
    }

    pub fn driver(&self) -> &DaemonDriver {
        &self.driver
    }

    pub fn relay_ports(&self) -> Vec<u16> {
        self.relays.iter().map(|relay| relay.port).collect()
    }

    pub fn daemon_version(&self) -> Option<DaemonVersion> {
        self.version
    }

    pub fn wallet(&self) -> Option<&TestWallet> {
        self.wallet.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /**
       Kill every relay server, then ask the daemon to stop.

       Teardown is best-effort: failures are logged and never returned,
       so that cleanup cannot mask the outcome of the tests. Calls after
       the first are no-ops.
    */
    pub fn teardown(&mut self) {
        if self.finalized {
            return;
        }

        self.finalized = true;

        info!("tearing down test environment");

        for mut relay in self.relays.drain(..) {
            if let Err(e) = relay.kill() {
                warn!("failed to kill relay server on port {}: {}", relay.port, e);
            }
        }

        if self.daemon_started {
            match stop_daemon(&self.launcher, &self.driver) {
                Ok(output) if output.success() => {
                    info!("stopped bitcoind");
                }
                Ok(output) => {
                    warn!(
                        "bitcoin-cli stop exited with status {:?}: {}",
                        output.status,
                        output.combined()
                    );
                }
                Err(e) => {
                    warn!("failed to stop bitcoind: {}", e);
                }
            }
        }
    }
}

impl<L: Launcher> Drop for TestSession<L> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<L: Launcher> ExportEnv for TestSession<L> {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        self.driver.export_env(writer);

        if let Some(wallet) = &self.wallet {
            writer.write_env("BTC_WALLET", &wallet.name);
        }

        writer.write_env("IRC_PORTS", &self.relay_ports().iter().join(","));
    }
}
