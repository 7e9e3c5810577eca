/*!
   Re-export of common constructs that are used by test cases.
*/

pub use crate::bootstrap::environment::{bootstrap_environment, BootstrapStage};
pub use crate::bootstrap::init::init_test;
pub use crate::bootstrap::wallet::{TestWallet, FUNDING_BLOCKS, FUNDING_ROUNDS, TEST_WALLET_NAME};
pub use crate::chain::driver::DaemonDriver;
pub use crate::chain::exec::{simple_exec, CommandLine, ExecOutput, Launcher, SystemLauncher};
pub use crate::chain::version::{DaemonVersion, WalletCreation};
pub use crate::error::{handle_generic_error, Error};
pub use crate::framework::base::{run_environment_test, run_environment_test_with, EnvironmentTest};
pub use crate::framework::session::TestSession;
pub use crate::types::config::TestConfig;
pub use crate::types::env::{format_env, write_env, ExportEnv};
pub use crate::types::process::{ChildProcess, Terminate};
