use crate::chain::driver::DaemonDriver;
use crate::chain::exec::{simple_exec, Launcher};
use crate::chain::version::DaemonVersion;
use crate::error::Error;

/**
   Run `bitcoind -version` and parse the version from the first line of
   its output.
*/
pub fn daemon_version(
    launcher: &impl Launcher,
    driver: &DaemonDriver,
) -> Result<DaemonVersion, Error> {
    let output = simple_exec(
        launcher,
        "daemon version",
        &driver.daemon_command().arg("-version"),
    )?;

    DaemonVersion::parse(&output.stdout)
}
