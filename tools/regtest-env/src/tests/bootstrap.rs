use test_log::test;

use super::recording::{failed_output, test_config, Event, RecordingLauncher};
use crate::bootstrap::environment::{bootstrap_environment, BootstrapStage};
use crate::bootstrap::wallet::{FUNDING_BLOCKS, TEST_WALLET_NAME};
use crate::chain::version::DaemonVersion;
use crate::error::{Error, ErrorDetail};
use crate::framework::session::TestSession;

#[test]
fn full_bootstrap_funds_one_wallet() -> Result<(), Error> {
    let launcher = RecordingLauncher::new();
    let session = bootstrap_environment(&test_config(1), launcher.clone())?;

    assert!(session.is_ready());
    assert_eq!(session.daemon_version(), Some(DaemonVersion::new(23, 0)));

    assert_eq!(launcher.executed_with("createwallet").len(), 1);
    assert_eq!(launcher.executed_with("loadwallet").len(), 1);
    assert_eq!(launcher.executed_with("getnewaddress").len(), 2);

    let generated = launcher.executed_with("generatetoaddress");
    assert_eq!(generated.len(), 2);

    for (command, address) in generated.iter().zip(["bcrt1qfunding1", "bcrt1qfunding2"]) {
        assert!(command.has_arg(&format!("-rpcwallet={TEST_WALLET_NAME}")));
        assert!(command.args.ends_with(&[
            "generatetoaddress".to_string(),
            "301".to_string(),
            address.to_string()
        ]));
    }

    let wallet = session.wallet().expect("wallet should be recorded");
    assert_eq!(wallet.name, TEST_WALLET_NAME);
    assert_eq!(wallet.funding_addresses, ["bcrt1qfunding1", "bcrt1qfunding2"]);
    assert_eq!(wallet.blocks_mined, 2 * FUNDING_BLOCKS);

    Ok(())
}

#[test]
fn steps_run_in_order() -> Result<(), Error> {
    let launcher = RecordingLauncher::new();
    let _session = bootstrap_environment(&test_config(1), launcher.clone())?;

    let events = launcher.events();
    assert!(matches!(&events[0], Event::Spawn(_)));

    let methods: Vec<&str> = events[1..]
        .iter()
        .map(|event| match event {
            Event::Exec(command) => command
                .args
                .iter()
                .map(String::as_str)
                .find(|arg| {
                    [
                        "-version",
                        "-daemon",
                        "createwallet",
                        "loadwallet",
                        "getnewaddress",
                        "generatetoaddress",
                    ]
                    .contains(arg)
                })
                .unwrap_or("other"),
            _ => "not exec",
        })
        .collect();

    assert_eq!(
        methods,
        [
            "-version",
            "-daemon",
            "createwallet",
            "loadwallet",
            "getnewaddress",
            "generatetoaddress",
            "getnewaddress",
            "generatetoaddress",
        ]
    );

    Ok(())
}

#[test]
fn relays_listen_on_consecutive_ports() -> Result<(), Error> {
    let launcher = RecordingLauncher::new();
    let session = bootstrap_environment(&test_config(2), launcher.clone())?;

    let spawned = launcher.spawned();
    assert_eq!(spawned.len(), 2);

    assert_eq!(
        spawned[0].args,
        ["--ports=16667", "--motd=/srv/miniircd/testmotd"]
    );
    assert_eq!(
        spawned[1].args,
        ["--ports=16668", "--motd=/srv/miniircd/testmotd"]
    );

    assert_eq!(session.relay_ports(), [16667, 16668]);

    Ok(())
}

#[test]
fn launches_exactly_the_configured_number_of_relays() -> Result<(), Error> {
    for count in [0, 1, 5] {
        let launcher = RecordingLauncher::new();
        let session = bootstrap_environment(&test_config(count), launcher.clone())?;

        let ports = session.relay_ports();
        assert_eq!(launcher.spawned().len(), count);
        assert_eq!(ports.len(), count);
        assert!(ports.windows(2).all(|pair| pair[0] < pair[1]));
    }

    Ok(())
}

#[test]
fn descriptor_wallets_disabled_on_recent_daemons() -> Result<(), Error> {
    let launcher = RecordingLauncher::with_version("Bitcoin Core v23.0.0");
    let _session = bootstrap_environment(&test_config(1), launcher.clone())?;

    let created = launcher.executed_with("createwallet");
    assert!(created[0].args.ends_with(&[
        "-rpcwait".to_string(),
        "-named".to_string(),
        "createwallet".to_string(),
        format!("wallet_name={TEST_WALLET_NAME}"),
        "descriptors=false".to_string(),
    ]));

    Ok(())
}

#[test]
fn positional_wallet_creation_on_older_daemons() -> Result<(), Error> {
    let launcher = RecordingLauncher::with_version("Bitcoin Core version v0.21.1");
    let _session = bootstrap_environment(&test_config(1), launcher.clone())?;

    let created = launcher.executed_with("createwallet");
    assert!(!created[0].has_arg("-named"));
    assert!(created[0].args.ends_with(&[
        "-rpcwait".to_string(),
        "createwallet".to_string(),
        TEST_WALLET_NAME.to_string(),
    ]));

    Ok(())
}

#[test]
fn failing_address_request_aborts_before_mining() {
    let launcher = RecordingLauncher::new().failing(
        "getnewaddress",
        failed_output(
            18,
            "error code: -18\nerror message:\nRequested wallet does not exist or is not loaded\n",
        ),
    );

    let mut session = TestSession::new(test_config(1), launcher.clone());
    let err = session.bootstrap().unwrap_err();

    match err.detail() {
        ErrorDetail::BootstrapAborted(e) => assert!(e.output.contains("error code: -18")),
        e => panic!("expected bootstrap to abort, got {:?}", e),
    }

    assert!(launcher.executed_with("generatetoaddress").is_empty());
    assert_eq!(session.stage(), BootstrapStage::WalletLoaded);
    assert!(!session.is_ready());
}

#[test]
fn unrecognized_version_stops_before_starting_daemon() {
    let launcher = RecordingLauncher::with_version("bitcoind custom build");

    let mut session = TestSession::new(test_config(1), launcher.clone());
    let err = session.bootstrap().unwrap_err();

    assert!(matches!(err.detail(), ErrorDetail::UnrecognizedVersion(_)));
    assert!(launcher.executed_with("-daemon").is_empty());
    assert_eq!(session.stage(), BootstrapStage::RelaysUp);
}

#[test]
fn failing_version_command_is_fatal() {
    let launcher = RecordingLauncher::new().failing("-version", failed_output(127, "not found"));

    let err = bootstrap_environment(&test_config(1), launcher.clone())
        .err()
        .expect("bootstrap should fail");

    assert!(matches!(err.detail(), ErrorDetail::CommandFailed(_)));
}

#[test]
fn existing_wallet_is_reused() -> Result<(), Error> {
    let launcher = RecordingLauncher::new()
        .failing(
            "createwallet",
            failed_output(
                4,
                "error code: -4\nerror message:\nWallet file verification failed. Failed to create database path '/root/.bitcoin/regtest/wallets/jm-test-wallet'. Database already exists.\n",
            ),
        )
        .failing(
            "loadwallet",
            failed_output(
                35,
                "error code: -35\nerror message:\nWallet \"jm-test-wallet\" is already loaded.\n",
            ),
        );

    let session = bootstrap_environment(&test_config(1), launcher.clone())?;

    assert!(session.is_ready());
    assert_eq!(launcher.executed_with("generatetoaddress").len(), 2);

    Ok(())
}

#[test]
fn other_wallet_failures_are_fatal() {
    let launcher = RecordingLauncher::new().failing(
        "createwallet",
        failed_output(
            1,
            "error: timeout on transient error: Could not connect to the server 127.0.0.1:18443\n",
        ),
    );

    let mut session = TestSession::new(test_config(1), launcher.clone());
    let err = session.bootstrap().unwrap_err();

    assert!(matches!(err.detail(), ErrorDetail::CommandFailed(_)));
    assert!(launcher.executed_with("loadwallet").is_empty());
    assert!(launcher.executed_with("getnewaddress").is_empty());
    assert_eq!(session.stage(), BootstrapStage::DaemonRunning);
}

#[test]
fn session_cannot_be_bootstrapped_twice() -> Result<(), Error> {
    let launcher = RecordingLauncher::new();

    let mut session = TestSession::new(test_config(1), launcher.clone());
    session.bootstrap()?;

    assert!(session.bootstrap().is_err());
    assert_eq!(launcher.spawned().len(), 1);

    Ok(())
}
