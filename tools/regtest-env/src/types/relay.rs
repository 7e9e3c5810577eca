/*!
   A relay server instance running in the background.
*/

use std::path::{Path, PathBuf};

use crate::chain::exec::CommandLine;
use crate::error::Error;
use crate::types::process::Terminate;

/**
   One launched relay server. There is no shutdown protocol for the relay,
   so the only thing that can be done with it is to kill it.
*/
#[derive(Debug)]
pub struct RelayServer<Process> {
    pub port: u16,

    pub motd: PathBuf,

    process: Process,
}

impl<Process: Terminate> RelayServer<Process> {
    pub fn new(port: u16, motd: PathBuf, process: Process) -> Self {
        Self {
            port,
            motd,
            process,
        }
    }

    pub fn kill(&mut self) -> Result<(), Error> {
        self.process.kill()
    }
}

/// `<command> --ports=<port> --motd=<motd>`
pub fn relay_command(command: &Path, port: u16, motd: &Path) -> CommandLine {
    CommandLine::new(command)
        .arg(format!("--ports={port}"))
        .arg(format!("--motd={}", motd.display()))
}
