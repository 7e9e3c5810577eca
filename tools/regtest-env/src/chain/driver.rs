/*!
   Implementation of [`DaemonDriver`].
*/

use std::path::PathBuf;

use crate::chain::exec::CommandLine;
use crate::types::config::TestConfig;
use crate::types::env::{EnvWriter, ExportEnv};

pub const DAEMON_BINARY: &str = "bitcoind";

pub const CLI_BINARY: &str = "bitcoin-cli";

/**
    A driver for the regtest bitcoind through its command line binaries.

    The daemon forks itself into the background when started, so there is
    no process handle to hold on to. Instead it is addressed through
    `bitcoin-cli -regtest`, which finds it through the regtest data
    directory and the RPC credentials.
*/
#[derive(Debug, Clone)]
pub struct DaemonDriver {
    /**
       The directory containing `bitcoind` and `bitcoin-cli`.
    */
    pub bin_dir: PathBuf,

    /**
       The configuration file passed to `bitcoind -conf`.
    */
    pub conf_path: PathBuf,

    pub rpc_user: String,

    pub rpc_password: String,
}

impl ExportEnv for DaemonDriver {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        writer.write_env("BTC_DAEMON", &self.daemon_path().display().to_string());
        writer.write_env("BTC_CLI", &self.cli_path().display().to_string());
        writer.write_env("BTC_CONF", &self.conf_path.display().to_string());
        writer.write_env("BTC_RPC_USER", &self.rpc_user);
        writer.write_env("BTC_RPC_PASSWORD", &self.rpc_password);
    }
}

impl DaemonDriver {
    pub fn new(
        bin_dir: PathBuf,
        conf_path: PathBuf,
        rpc_user: String,
        rpc_password: String,
    ) -> Self {
        Self {
            bin_dir,
            conf_path,
            rpc_user,
            rpc_password,
        }
    }

    pub fn from_config(config: &TestConfig) -> Self {
        Self::new(
            config.bitcoin_bin_dir.clone(),
            config.bitcoin_conf.clone(),
            config.rpc_user.clone(),
            config.rpc_password.clone(),
        )
    }

    pub fn daemon_path(&self) -> PathBuf {
        self.bin_dir.join(DAEMON_BINARY)
    }

    pub fn cli_path(&self) -> PathBuf {
        self.bin_dir.join(CLI_BINARY)
    }

    /// `bitcoind` without arguments.
    pub fn daemon_command(&self) -> CommandLine {
        CommandLine::new(self.daemon_path())
    }

    /**
       `bitcoin-cli` authenticated against the regtest node. The RPC
       method and its arguments are appended by the caller.
    */
    pub fn cli_command(&self) -> CommandLine {
        CommandLine::new(self.cli_path()).args([
            "-regtest".to_string(),
            format!("-rpcuser={}", self.rpc_user),
            format!("-rpcpassword={}", self.rpc_password),
        ])
    }

    /// Same as [`cli_command`](Self::cli_command), scoped to a loaded wallet.
    pub fn wallet_command(&self, wallet_name: &str) -> CommandLine {
        self.cli_command().arg(format!("-rpcwallet={wallet_name}"))
    }
}
