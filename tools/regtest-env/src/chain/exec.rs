/*!
   Blocking and background execution of external commands.
*/

use core::fmt::{self, Display};
use itertools::Itertools;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, trace};

use crate::error::{handle_exec_error, Error};
use crate::types::process::{ChildProcess, Terminate};

/**
   A program together with its arguments.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// Masks the RPC password so that command lines can be logged.
impl Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self.args.iter().map(|arg| {
            if arg.starts_with("-rpcpassword=") {
                "-rpcpassword=****"
            } else {
                arg.as_str()
            }
        });

        write!(f, "{}", self.program.display())?;

        if !self.args.is_empty() {
            write!(f, " {}", args.format(" "))?;
        }

        Ok(())
    }
}

/**
   The captured result of a blocking command execution.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// The captured stdout followed by the captured stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }

    pub fn first_line(&self) -> &str {
        self.stdout.lines().next().unwrap_or_default()
    }
}

/**
   Launches external commands, either blocking until they exit or in the
   background.

   The environment bootstrap is written against this trait so that it
   can be driven without real binaries.
*/
pub trait Launcher {
    type Process: Terminate;

    /**
       Run the command to completion and capture its output. A non-zero
       exit status is returned as part of [`ExecOutput`] rather than as
       an error.
    */
    fn exec(&self, command: &CommandLine) -> Result<ExecOutput, Error>;

    /**
       Start the command in the background with its standard streams
       discarded, returning a handle that can only be killed.
    */
    fn spawn(&self, command: &CommandLine) -> Result<Self::Process, Error>;
}

/**
   [`Launcher`] backed by [`std::process::Command`].
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    type Process = ChildProcess;

    fn exec(&self, command: &CommandLine) -> Result<ExecOutput, Error> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(handle_exec_error(&command.program))?;

        let stdout = String::from_utf8(output.stdout).map_err(Error::utf8)?;
        let stderr = String::from_utf8(output.stderr).map_err(Error::utf8)?;

        Ok(ExecOutput {
            status: output.status.code(),
            stdout,
            stderr,
        })
    }

    fn spawn(&self, command: &CommandLine) -> Result<ChildProcess, Error> {
        // Piping the output of a long running process that nobody reads
        // eventually blocks it on a full pipe buffer.
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(handle_exec_error(&command.program))?;

        Ok(ChildProcess::new(child))
    }
}

/**
   Execute a command and return its output, failing with
   [`Error::command_failed`] if it exits with a non-zero status.
*/
pub fn simple_exec(
    launcher: &impl Launcher,
    desc: &str,
    command: &CommandLine,
) -> Result<ExecOutput, Error> {
    let output = logged_exec(launcher, desc, command)?;

    if output.success() {
        Ok(output)
    } else {
        Err(Error::command_failed(
            command.to_string(),
            output.status,
            output.combined(),
        ))
    }
}

/**
   Execute a command, logging the command line and the captured output,
   without interpreting the exit status.
*/
pub fn logged_exec(
    launcher: &impl Launcher,
    desc: &str,
    command: &CommandLine,
) -> Result<ExecOutput, Error> {
    debug!("Executing command for {}: {}", desc, command);

    let output = launcher.exec(command)?;

    trace!(
        "command exited with status {:?}, stdout: {}, stderr: {}",
        output.status,
        output.stdout,
        output.stderr
    );

    Ok(output)
}
