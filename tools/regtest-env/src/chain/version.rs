/*!
   Detection of the bitcoind version, and the choice of wallet creation
   call that follows from it.
*/

use core::fmt::{self, Display};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

lazy_static! {
    // Greedy prefix, so the last `vMAJOR.MINOR` on the line wins.
    static ref VERSION_RE: Regex = Regex::new(r"^.*v(?P<major>\d+)\.(?P<minor>\d+)").unwrap();
}

/**
   First major release on which `createwallet` creates descriptor wallets
   by default, including the 22.99 development builds.
*/
pub const NAMED_WALLET_CREATION_MAJOR: u64 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DaemonVersion {
    pub major: u64,
    pub minor: u64,
}

impl DaemonVersion {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /**
       Parse the version from the output of `bitcoind -version`. Only the
       first line is considered, e.g. `Bitcoin Core version v23.0.0`.
    */
    pub fn parse(output: &str) -> Result<Self, Error> {
        let line = output.lines().next().unwrap_or_default();

        let captures = VERSION_RE
            .captures(line)
            .ok_or_else(|| Error::unrecognized_version(line.to_string()))?;

        let component = |name: &str| {
            captures[name]
                .parse::<u64>()
                .map_err(|_| Error::unrecognized_version(line.to_string()))
        };

        Ok(Self {
            major: component("major")?,
            minor: component("minor")?,
        })
    }
}

impl Display for DaemonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/**
   The two incompatible forms of the `createwallet` RPC call that the
   bootstrap needs to issue, depending on the daemon version.

   Only legacy (non-descriptor) wallets are supported by the software
   under test, so descriptors have to be turned off explicitly on daemons
   where they are the default.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletCreation {
    /// `createwallet <name>`
    Legacy,
    /// `-named createwallet wallet_name=<name> descriptors=false`
    Named,
}

impl WalletCreation {
    pub fn for_version(version: &DaemonVersion) -> Self {
        if version.major >= NAMED_WALLET_CREATION_MAJOR {
            Self::Named
        } else {
            Self::Legacy
        }
    }

    /// Arguments to append to the bitcoin-cli base command.
    pub fn rpc_args(&self, wallet_name: &str) -> Vec<String> {
        match self {
            Self::Legacy => vec!["createwallet".to_string(), wallet_name.to_string()],
            Self::Named => vec![
                "-named".to_string(),
                "createwallet".to_string(),
                format!("wallet_name={wallet_name}"),
                "descriptors=false".to_string(),
            ],
        }
    }
}
