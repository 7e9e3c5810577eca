use tracing::info;

use crate::chain::driver::DaemonDriver;
use crate::chain::exec::{logged_exec, simple_exec, ExecOutput, Launcher};
use crate::chain::version::WalletCreation;
use crate::error::Error;

const RPC_WALLET_ALREADY_LOADED: i64 = -35;

/**
   Create the wallet, waiting with `-rpcwait` for the RPC endpoint of a
   freshly started daemon to come up.

   The regtest data directory outlives a session, so on a rerun the
   wallet is already on disk. That failure is not an error.
*/
pub fn create_wallet(
    launcher: &impl Launcher,
    driver: &DaemonDriver,
    creation: WalletCreation,
    wallet_name: &str,
) -> Result<(), Error> {
    let command = driver
        .cli_command()
        .arg("-rpcwait")
        .args(creation.rpc_args(wallet_name));

    let output = logged_exec(launcher, "create wallet", &command)?;

    if output.success() {
        Ok(())
    } else if output.combined().contains("already exists") {
        info!("wallet {} already exists, reusing it", wallet_name);
        Ok(())
    } else {
        Err(Error::command_failed(
            command.to_string(),
            output.status,
            output.combined(),
        ))
    }
}

/**
   Load the wallet. A wallet that is already loaded, e.g. because
   `createwallet` just loaded it, is accepted.
*/
pub fn load_wallet(
    launcher: &impl Launcher,
    driver: &DaemonDriver,
    wallet_name: &str,
) -> Result<(), Error> {
    let command = driver.cli_command().arg("loadwallet").arg(wallet_name);

    let output = logged_exec(launcher, "load wallet", &command)?;

    if output.success() || is_already_loaded(&output) {
        Ok(())
    } else {
        Err(Error::command_failed(
            command.to_string(),
            output.status,
            output.combined(),
        ))
    }
}

/**
   Request a new receiving address from the wallet. Without an address
   the wallet cannot be funded, so a failure here aborts the bootstrap
   with the output of the failed call.
*/
pub fn new_address(
    launcher: &impl Launcher,
    driver: &DaemonDriver,
    wallet_name: &str,
) -> Result<String, Error> {
    let command = driver.wallet_command(wallet_name).arg("getnewaddress");

    let output = logged_exec(launcher, "new address", &command)?;

    let address = output.first_line().trim();

    if output.success() && !address.is_empty() {
        Ok(address.to_string())
    } else {
        Err(Error::bootstrap_aborted(
            "bitcoin-cli getnewaddress failing".to_string(),
            output.combined(),
        ))
    }
}

/**
   Mine `blocks` blocks with the coinbase reward paid to `address`.
*/
pub fn generate_to_address(
    launcher: &impl Launcher,
    driver: &DaemonDriver,
    wallet_name: &str,
    blocks: u64,
    address: &str,
) -> Result<(), Error> {
    simple_exec(
        launcher,
        "generate to address",
        &driver
            .wallet_command(wallet_name)
            .arg("generatetoaddress")
            .arg(blocks.to_string())
            .arg(address),
    )?;

    Ok(())
}

/**
   Extract the RPC error code from bitcoin-cli output of the form
   `error code: -35`.
*/
pub fn rpc_error_code(output: &str) -> Option<i64> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("error code:"))
        .and_then(|code| code.trim().parse().ok())
}

fn is_already_loaded(output: &ExecOutput) -> bool {
    let combined = output.combined();

    rpc_error_code(&combined) == Some(RPC_WALLET_ALREADY_LOADED)
        || combined.contains("already loaded")
        // Daemons before v22 report a loaded wallet as a duplicate.
        || combined.contains("Duplicate -wallet filename")
}
