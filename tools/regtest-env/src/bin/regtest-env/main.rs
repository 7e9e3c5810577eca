//! Runs a test command inside a regtest environment session: the
//! environment is bootstrapped before the command starts and torn down
//! after it exits, whatever its outcome.

use clap::Parser;
use std::process::{exit, Command};
use tracing::{error, info};

use regtest_env::bootstrap::environment::bootstrap_environment;
use regtest_env::bootstrap::init::init_logging;
use regtest_env::chain::exec::SystemLauncher;
use regtest_env::types::config::{self, TestConfig};
use regtest_env::types::env::{collect_env, write_env};

#[derive(Debug, Parser)]
#[command(
    name = "regtest-env",
    about = "Run a test command against a disposable bitcoind regtest node and IRC relay servers"
)]
struct Cli {
    /// Directory containing the bitcoind and bitcoin-cli binaries
    #[arg(long, env = "BTC_ROOT")]
    btcroot: Option<String>,

    /// bitcoind configuration file [default: test/bitcoin.conf in this crate]
    #[arg(long, env = "BTC_CONF")]
    btcconf: Option<String>,

    /// RPC password of the regtest node
    #[arg(long, env = "BTC_RPC_PASSWORD", hide_env_values = true)]
    btcpwd: Option<String>,

    /// RPC username of the regtest node [default: bitcoinrpc]
    #[arg(long, env = "BTC_RPC_USER")]
    btcuser: Option<String>,

    /// Number of IRC relay servers to launch [default: 1]
    #[arg(long, env = "IRC_INSTANCES")]
    nirc: Option<usize>,

    /// Relay server executable [default: ./miniircd/miniircd]
    #[arg(long, env = "IRC_COMMAND")]
    irc_command: Option<String>,

    /// Message of the day file for the relay servers [default: miniircd/testmotd]
    #[arg(long, env = "IRC_MOTD")]
    irc_motd: Option<String>,

    /// Port of the first relay server [default: 16667]
    #[arg(long, env = "IRC_BASE_PORT")]
    irc_base_port: Option<u16>,

    /// Write the session environment variables to this file
    #[arg(long, env = "ENV_EXPORT_PATH")]
    export_env: Option<String>,

    /// The test command to run, e.g. `-- pytest -s test/`
    #[arg(last = true, required = true)]
    command: Vec<String>,
}

impl Cli {
    /// The flag value for a config option, in the form the environment
    /// variable of the same option would have.
    fn option(&self, key: &str) -> Option<String> {
        match key {
            config::BTC_ROOT => self.btcroot.clone(),
            config::BTC_CONF => self.btcconf.clone(),
            config::BTC_RPC_PASSWORD => self.btcpwd.clone(),
            config::BTC_RPC_USER => self.btcuser.clone(),
            config::IRC_INSTANCES => self.nirc.map(|count| count.to_string()),
            config::IRC_COMMAND => self.irc_command.clone(),
            config::IRC_MOTD => self.irc_motd.clone(),
            config::IRC_BASE_PORT => self.irc_base_port.map(|port| port.to_string()),
            config::ENV_EXPORT_PATH => self.export_env.clone(),
            _ => None,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging();

    match run(&cli) {
        Ok(code) => exit(code),
        Err(e) => {
            error!("{:?}", e);
            exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32, eyre::Report> {
    let config = TestConfig::from_lookup(|key| cli.option(key))?;

    info!("starting test session with config: {:?}", config);

    let mut session = bootstrap_environment(&config, SystemLauncher)?;

    if let Some(path) = &config.env_export_path {
        write_env(path, &session)?;
        info!("written test environment variables to {}", path.display());
    }

    let (program, args) = cli
        .command
        .split_first()
        .ok_or_else(|| eyre::eyre!("no test command given"))?;

    info!("running test command: {}", cli.command.join(" "));

    let status = Command::new(program)
        .args(args)
        .envs(collect_env(&session))
        .status();

    // `exit` skips destructors, so the session is torn down explicitly.
    session.teardown();

    let status = status?;

    info!("test command exited with {}", status);

    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("regtest-env").chain(args.iter().copied()))
    }

    #[test]
    fn numeric_flags_resolve_into_config() -> Result<(), eyre::Report> {
        let cli = parse(&[
            "--btcroot=/opt/bitcoin/bin",
            "--btcpwd=secret",
            "--nirc=3",
            "--irc-base-port=17000",
            "--",
            "pytest",
        ])?;

        assert_eq!(cli.option(config::IRC_INSTANCES).as_deref(), Some("3"));

        let config = TestConfig::from_lookup(|key| cli.option(key))?;
        assert_eq!(config.relay_ports()?, vec![17000, 17001, 17002]);

        Ok(())
    }

    #[test]
    fn malformed_numeric_flags_are_rejected_by_clap() {
        let args = ["--btcroot=/opt/bitcoin/bin", "--btcpwd=secret"];

        let not_a_count = parse(&[args[0], args[1], "--nirc=two", "--", "pytest"]);
        assert!(not_a_count.is_err());

        let port_overflow = parse(&[args[0], args[1], "--irc-base-port=70000", "--", "pytest"]);
        assert!(port_overflow.is_err());
    }
}
