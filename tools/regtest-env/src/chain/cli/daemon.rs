use crate::chain::driver::DaemonDriver;
use crate::chain::exec::{logged_exec, simple_exec, ExecOutput, Launcher};
use crate::error::Error;

/**
   Start bitcoind in regtest mode with `-daemon`. This returns as soon as
   the daemonizing parent exits, not when the node is ready to serve
   RPC calls.
*/
pub fn start_daemon(launcher: &impl Launcher, driver: &DaemonDriver) -> Result<(), Error> {
    simple_exec(
        launcher,
        "start daemon",
        &driver.daemon_command().args([
            "-regtest".to_string(),
            "-daemon".to_string(),
            format!("-conf={}", driver.conf_path.display()),
        ]),
    )?;

    Ok(())
}

/**
   Ask the daemon to shut down through `bitcoin-cli stop`. The exit status
   is returned to the caller unchecked, as the daemon may already be gone.
*/
pub fn stop_daemon(launcher: &impl Launcher, driver: &DaemonDriver) -> Result<ExecOutput, Error> {
    logged_exec(launcher, "stop daemon", &driver.cli_command().arg("stop"))
}
