/*!
   Bootstrapping of the complete test environment.
*/

use core::fmt::{self, Display};
use tracing::info;

use crate::bootstrap::relays::launch_relays;
use crate::bootstrap::wallet::{TestWallet, FUNDING_ROUNDS, TEST_WALLET_NAME};
use crate::chain::cli::daemon::start_daemon;
use crate::chain::cli::version::daemon_version;
use crate::chain::exec::Launcher;
use crate::error::Error;
use crate::framework::session::TestSession;
use crate::types::config::TestConfig;

/**
   The stages a session goes through during bootstrap, in order. A
   failing step leaves the session in the last stage it reached.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootstrapStage {
    Unstarted,
    RelaysUp,
    DaemonVersionKnown,
    DaemonRunning,
    WalletCreated,
    WalletLoaded,
    /// Number of completed funding rounds.
    Funded(usize),
    Ready,
}

impl Display for BootstrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funded(rounds) => write!(f, "Funded({rounds}/{FUNDING_ROUNDS})"),
            stage => write!(f, "{stage:?}"),
        }
    }
}

/**
   Launch and configure the whole environment, returning the session that
   owns it.

   If any step fails, the returned error carries the cause and the
   processes launched so far are torn down as the session is dropped.
*/
pub fn bootstrap_environment<L: Launcher>(
    config: &TestConfig,
    launcher: L,
) -> Result<TestSession<L>, Error> {
    let mut session = TestSession::new(config.clone(), launcher);

    session.bootstrap()?;

    Ok(session)
}

impl<L: Launcher> TestSession<L> {
    /**
       Run the bootstrap steps in order:

       1. launch the relay servers,
       2. detect the bitcoind version,
       3. start bitcoind in regtest mode,
       4. create the test wallet in the form matching the version,
       5. load it,
       6. fund it [`FUNDING_ROUNDS`] times.

       No step is retried. Waiting for the RPC endpoint of the freshly
       started daemon is left to `bitcoin-cli -rpcwait`.
    */
    pub fn bootstrap(&mut self) -> Result<(), Error> {
        if self.stage != BootstrapStage::Unstarted {
            return Err(Error::generic(eyre::eyre!(
                "session has already been bootstrapped up to stage {}",
                self.stage
            )));
        }

        self.relays = launch_relays(&self.launcher, &self.config)?;
        advance(&mut self.stage, BootstrapStage::RelaysUp);

        let version = daemon_version(&self.launcher, &self.driver)?;
        self.version = Some(version);
        advance(&mut self.stage, BootstrapStage::DaemonVersionKnown);

        start_daemon(&self.launcher, &self.driver)?;
        self.daemon_started = true;
        advance(&mut self.stage, BootstrapStage::DaemonRunning);

        let wallet = self.wallet.insert(TestWallet::new(TEST_WALLET_NAME));

        wallet.create(&self.launcher, &self.driver, &version)?;
        advance(&mut self.stage, BootstrapStage::WalletCreated);

        wallet.load(&self.launcher, &self.driver)?;
        advance(&mut self.stage, BootstrapStage::WalletLoaded);

        for round in 1..=FUNDING_ROUNDS {
            wallet.fund(
                &self.launcher,
                &self.driver,
                self.config.funding_settle_delay,
            )?;
            advance(&mut self.stage, BootstrapStage::Funded(round));
        }

        advance(&mut self.stage, BootstrapStage::Ready);

        Ok(())
    }
}

fn advance(stage: &mut BootstrapStage, next: BootstrapStage) {
    info!("test environment: {} -> {}", stage, next);
    *stage = next;
}
