use core::time::Duration;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::chain::exec::{CommandLine, ExecOutput, Launcher};
use crate::error::Error;
use crate::types::config::TestConfig;
use crate::types::process::Terminate;

pub const RELEASE_VERSION: &str = "Bitcoin Core version v23.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Exec(CommandLine),
    Spawn(CommandLine),
    Kill(CommandLine),
}

#[derive(Default)]
struct Recording {
    events: Vec<Event>,
    version_output: String,
    failures: Vec<(String, ExecOutput)>,
    addresses: usize,
}

/**
   A [`Launcher`] that records every invocation and answers blocking calls
   with canned output: the configured version for `-version`, a fresh
   address for `getnewaddress`, and success for everything else unless a
   failure was registered for the RPC method.

   Clones share the same recording, so a test can keep one while the
   session owns another.
*/
#[derive(Clone)]
pub struct RecordingLauncher {
    recording: Rc<RefCell<Recording>>,
}

pub struct RecordedProcess {
    command: CommandLine,
    recording: Rc<RefCell<Recording>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::with_version(RELEASE_VERSION)
    }

    pub fn with_version(version_output: &str) -> Self {
        let recording = Recording {
            version_output: version_output.to_string(),
            ..Recording::default()
        };

        Self {
            recording: Rc::new(RefCell::new(recording)),
        }
    }

    /// Fail every blocking call that has `method` among its arguments.
    pub fn failing(self, method: &str, output: ExecOutput) -> Self {
        self.recording
            .borrow_mut()
            .failures
            .push((method.to_string(), output));
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.recording.borrow().events.clone()
    }

    pub fn executed(&self) -> Vec<CommandLine> {
        self.filter(|event| match event {
            Event::Exec(command) => Some(command.clone()),
            _ => None,
        })
    }

    pub fn spawned(&self) -> Vec<CommandLine> {
        self.filter(|event| match event {
            Event::Spawn(command) => Some(command.clone()),
            _ => None,
        })
    }

    pub fn killed(&self) -> Vec<CommandLine> {
        self.filter(|event| match event {
            Event::Kill(command) => Some(command.clone()),
            _ => None,
        })
    }

    /// Blocking calls that carried `arg`, e.g. an RPC method name.
    pub fn executed_with(&self, arg: &str) -> Vec<CommandLine> {
        self.executed()
            .into_iter()
            .filter(|command| command.has_arg(arg))
            .collect()
    }

    fn filter(&self, f: impl Fn(&Event) -> Option<CommandLine>) -> Vec<CommandLine> {
        self.recording.borrow().events.iter().filter_map(f).collect()
    }
}

impl Launcher for RecordingLauncher {
    type Process = RecordedProcess;

    fn exec(&self, command: &CommandLine) -> Result<ExecOutput, Error> {
        let mut recording = self.recording.borrow_mut();

        recording.events.push(Event::Exec(command.clone()));

        let failure = recording
            .failures
            .iter()
            .find(|(method, _)| command.has_arg(method))
            .map(|(_, output)| output.clone());

        if let Some(output) = failure {
            return Ok(output);
        }

        let stdout = if command.has_arg("-version") {
            format!("{}\nCopyright (C) 2009-2022 The Bitcoin Core developers\n", recording.version_output)
        } else if command.has_arg("getnewaddress") {
            recording.addresses += 1;
            format!("bcrt1qfunding{}\n", recording.addresses)
        } else {
            String::new()
        };

        Ok(ExecOutput {
            status: Some(0),
            stdout,
            stderr: String::new(),
        })
    }

    fn spawn(&self, command: &CommandLine) -> Result<RecordedProcess, Error> {
        self.recording
            .borrow_mut()
            .events
            .push(Event::Spawn(command.clone()));

        Ok(RecordedProcess {
            command: command.clone(),
            recording: self.recording.clone(),
        })
    }
}

impl Terminate for RecordedProcess {
    fn kill(&mut self) -> Result<(), Error> {
        self.recording
            .borrow_mut()
            .events
            .push(Event::Kill(self.command.clone()));

        Ok(())
    }
}

pub fn failed_output(status: i32, stderr: &str) -> ExecOutput {
    ExecOutput {
        status: Some(status),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// A configuration with `relay_count` relays and no funding pause.
pub fn test_config(relay_count: usize) -> TestConfig {
    let vars = HashMap::from([
        ("BTC_ROOT", "/opt/bitcoin/bin".to_string()),
        ("BTC_RPC_PASSWORD", "secret".to_string()),
        ("IRC_INSTANCES", relay_count.to_string()),
        ("IRC_MOTD", "/srv/miniircd/testmotd".to_string()),
    ]);

    let mut config = TestConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("test configuration should resolve");

    config.funding_settle_delay = Duration::ZERO;

    config
}
