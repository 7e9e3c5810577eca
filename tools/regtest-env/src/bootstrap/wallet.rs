/*!
   Creation and funding of the test wallet.
*/

use core::time::Duration;
use std::thread::sleep;
use tracing::info;

use crate::chain::cli::wallet::{create_wallet, generate_to_address, load_wallet, new_address};
use crate::chain::driver::DaemonDriver;
use crate::chain::exec::Launcher;
use crate::chain::version::{DaemonVersion, WalletCreation};
use crate::error::Error;

pub const TEST_WALLET_NAME: &str = "jm-test-wallet";

/// Number of times a fresh address is funded.
pub const FUNDING_ROUNDS: usize = 2;

/**
   Blocks mined to each funding address, well above the 100 block
   coinbase maturity so that the rewards are spendable.
*/
pub const FUNDING_BLOCKS: u64 = 301;

/**
   The wallet inside the regtest node that tests spend from.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestWallet {
    pub name: String,

    /// Addresses that received coinbase rewards, in funding order.
    pub funding_addresses: Vec<String>,

    pub blocks_mined: u64,
}

impl TestWallet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            funding_addresses: Vec::new(),
            blocks_mined: 0,
        }
    }

    /**
       Create the wallet using the `createwallet` form that matches the
       daemon version.
    */
    pub fn create(
        &self,
        launcher: &impl Launcher,
        driver: &DaemonDriver,
        version: &DaemonVersion,
    ) -> Result<(), Error> {
        let creation = WalletCreation::for_version(version);

        info!(
            "creating wallet {} on bitcoind {} using {:?} creation",
            self.name, version, creation
        );

        create_wallet(launcher, driver, creation, &self.name)
    }

    pub fn load(&self, launcher: &impl Launcher, driver: &DaemonDriver) -> Result<(), Error> {
        load_wallet(launcher, driver, &self.name)
    }

    /**
       Fund the wallet once: mine [`FUNDING_BLOCKS`] blocks to a new
       address, then pause for `settle_delay`.
    */
    pub fn fund(
        &mut self,
        launcher: &impl Launcher,
        driver: &DaemonDriver,
        settle_delay: Duration,
    ) -> Result<(), Error> {
        let address = new_address(launcher, driver, &self.name)?;

        generate_to_address(launcher, driver, &self.name, FUNDING_BLOCKS, &address)?;

        info!("mined {} blocks to address {}", FUNDING_BLOCKS, address);

        self.funding_addresses.push(address);
        self.blocks_mined += FUNDING_BLOCKS;

        sleep(settle_delay);

        Ok(())
    }
}
