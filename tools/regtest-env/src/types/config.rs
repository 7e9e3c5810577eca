/*!
   Definition for the test environment configuration.
*/

use core::fmt::{self, Debug, Display};
use core::str::FromStr;
use core::time::Duration;
use std::path::PathBuf;

use crate::error::Error;

pub const BTC_ROOT: &str = "BTC_ROOT";
pub const BTC_CONF: &str = "BTC_CONF";
pub const BTC_RPC_PASSWORD: &str = "BTC_RPC_PASSWORD";
pub const BTC_RPC_USER: &str = "BTC_RPC_USER";
pub const IRC_INSTANCES: &str = "IRC_INSTANCES";
pub const IRC_COMMAND: &str = "IRC_COMMAND";
pub const IRC_MOTD: &str = "IRC_MOTD";
pub const IRC_BASE_PORT: &str = "IRC_BASE_PORT";
pub const ENV_EXPORT_PATH: &str = "ENV_EXPORT_PATH";

pub const DEFAULT_RPC_USER: &str = "bitcoinrpc";
pub const DEFAULT_RELAY_COUNT: usize = 1;
pub const DEFAULT_RELAY_COMMAND: &str = "./miniircd/miniircd";
pub const DEFAULT_RELAY_MOTD: &str = "miniircd/testmotd";
pub const DEFAULT_RELAY_BASE_PORT: u16 = 16667;

/// The regtest configuration file shipped with this crate.
pub const DEFAULT_BITCOIN_CONF: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test/bitcoin.conf");

/**
   Pause after each batch of generated blocks, giving the daemon time to
   settle before the next RPC call reads the wallet state.
*/
pub const FUNDING_SETTLE_DELAY: Duration = Duration::from_secs(1);

/**
   The test environment configuration, resolved once at the beginning of
   a test session and read-only afterwards.

   Every option is looked up by its environment variable name, e.g.
   `BTC_ROOT`. The runner binary accepts the same options as command line
   flags.
*/
#[derive(Clone)]
pub struct TestConfig {
    /**
       Directory containing the `bitcoind` and `bitcoin-cli` binaries.
       Must be supplied through `BTC_ROOT`.
    */
    pub bitcoin_bin_dir: PathBuf,

    /**
       The bitcoind configuration file passed as `-conf`. Defaults to
       [`DEFAULT_BITCOIN_CONF`].
    */
    pub bitcoin_conf: PathBuf,

    pub rpc_user: String,

    /**
       Must be supplied through `BTC_RPC_PASSWORD`, every authenticated
       bitcoin-cli call fails without it.
    */
    pub rpc_password: String,

    /**
       Number of relay server instances to launch. Instance `i` listens on
       `relay_base_port + i`.
    */
    pub relay_count: usize,

    pub relay_command: PathBuf,

    /**
       The message of the day file handed to every relay server. Resolved
       against the current directory at launch, as the relay server only
       accepts absolute paths.
    */
    pub relay_motd: PathBuf,

    pub relay_base_port: u16,

    /**
       If set, the environment variables describing the running session
       are written to this file as `KEY=VALUE` lines.
    */
    pub env_export_path: Option<PathBuf>,

    pub funding_settle_delay: Duration,
}

impl TestConfig {
    /**
       Resolve the configuration from a lookup of option values by their
       environment variable names. Required options are validated here,
       before anything is launched.
    */
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let bitcoin_bin_dir = lookup(BTC_ROOT)
            .map(PathBuf::from)
            .ok_or_else(|| Error::missing_option(BTC_ROOT.to_string()))?;

        let bitcoin_conf = lookup(BTC_CONF)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BITCOIN_CONF));

        let rpc_password = lookup(BTC_RPC_PASSWORD)
            .ok_or_else(|| Error::missing_option(BTC_RPC_PASSWORD.to_string()))?;

        let rpc_user = lookup(BTC_RPC_USER).unwrap_or_else(|| DEFAULT_RPC_USER.to_string());

        let relay_count = parse_option(IRC_INSTANCES, lookup(IRC_INSTANCES))?
            .unwrap_or(DEFAULT_RELAY_COUNT);

        let relay_command = lookup(IRC_COMMAND)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RELAY_COMMAND));

        let relay_motd = lookup(IRC_MOTD)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RELAY_MOTD));

        let relay_base_port = parse_option(IRC_BASE_PORT, lookup(IRC_BASE_PORT))?
            .unwrap_or(DEFAULT_RELAY_BASE_PORT);

        let env_export_path = lookup(ENV_EXPORT_PATH).map(PathBuf::from);

        let config = Self {
            bitcoin_bin_dir,
            bitcoin_conf,
            rpc_user,
            rpc_password,
            relay_count,
            relay_command,
            relay_motd,
            relay_base_port,
            env_export_path,
            funding_settle_delay: FUNDING_SETTLE_DELAY,
        };

        config.relay_ports()?;

        Ok(config)
    }

    /**
       The ports of the relay servers, one per instance counting up from
       the base port.
    */
    pub fn relay_ports(&self) -> Result<Vec<u16>, Error> {
        (0..self.relay_count)
            .map(|i| {
                u16::try_from(i)
                    .ok()
                    .and_then(|i| self.relay_base_port.checked_add(i))
                    .ok_or_else(|| {
                        Error::invalid_option(
                            IRC_INSTANCES.to_string(),
                            self.relay_count.to_string(),
                            format!("ports above {} are out of range", self.relay_base_port),
                        )
                    })
            })
            .collect()
    }
}

impl Debug for TestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestConfig")
            .field("bitcoin_bin_dir", &self.bitcoin_bin_dir)
            .field("bitcoin_conf", &self.bitcoin_conf)
            .field("rpc_user", &self.rpc_user)
            .field("rpc_password", &"****")
            .field("relay_count", &self.relay_count)
            .field("relay_command", &self.relay_command)
            .field("relay_motd", &self.relay_motd)
            .field("relay_base_port", &self.relay_base_port)
            .field("env_export_path", &self.env_export_path)
            .field("funding_settle_delay", &self.funding_settle_delay)
            .finish()
    }
}

fn parse_option<T>(option: &str, value: Option<String>) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| {
                Error::invalid_option(option.to_string(), value.clone(), e.to_string())
            })
        })
        .transpose()
}
