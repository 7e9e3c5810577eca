/*!
   Launching of the relay server instances.
*/

use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::chain::exec::Launcher;
use crate::error::Error;
use crate::types::config::TestConfig;
use crate::types::relay::{relay_command, RelayServer};

/**
   Launch one relay server in the background for each configured port.

   If a launch fails, the servers launched so far are killed as their
   handles are dropped.
*/
pub fn launch_relays<L: Launcher>(
    launcher: &L,
    config: &TestConfig,
) -> Result<Vec<RelayServer<L::Process>>, Error> {
    let motd = absolute_path(&config.relay_motd)?;

    config
        .relay_ports()?
        .into_iter()
        .map(|port| {
            let command = relay_command(&config.relay_command, port, &motd);

            let process = launcher.spawn(&command)?;

            info!("launched relay server on port {}", port);

            Ok(RelayServer::new(port, motd.clone(), process))
        })
        .collect()
}

/**
   Resolve a path against the current directory. The relay server
   rejects a relative motd path.
*/
pub fn absolute_path(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
