/*!
   Error type used for the environment bootstrap and the tests running
   against it.
*/

use eyre::Report;
use flex_error::{define_error, TraceError};
use std::io;
use std::path::Path;
use std::string::FromUtf8Error;

define_error! {
    Error {
        Generic
            [ TraceError<Report> ]
            | _ | { "generic error" },

        Io
            [ TraceError<io::Error> ]
            | _ | { "io error"},

        Utf8
            [ TraceError<FromUtf8Error> ]
            | _ | { "utf8 error"},

        CommandNotFound
            { command: String }
            [ TraceError<io::Error> ]
            | e | {
                format_args!("failed to execute command: {}. make sure the path to the binary is correct",
                    e.command)
            },

        CommandFailed
            {
                command: String,
                status: Option<i32>,
                output: String,
            }
            | e | {
                format_args!("command `{}` exited with error status {:?} and output: {}",
                    e.command, e.status, e.output)
            },

        MissingOption
            { option: String }
            | e | {
                format_args!("required option {} is not set", e.option)
            },

        InvalidOption
            {
                option: String,
                value: String,
                reason: String,
            }
            | e | {
                format_args!("invalid value `{}` for option {}: {}",
                    e.value, e.option, e.reason)
            },

        UnrecognizedVersion
            { line: String }
            | e | {
                format_args!("cannot find a vMAJOR.MINOR version in bitcoind output: {:?}",
                    e.line)
            },

        BootstrapAborted
            {
                reason: String,
                output: String,
            }
            | e | {
                format_args!("cannot setup tests, {}.\n{}",
                    e.reason, e.output)
            },
    }
}

pub fn handle_generic_error(e: impl Into<Report>) -> Error {
    Error::generic(e.into())
}

pub fn handle_exec_error(command: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    |e| match e.kind() {
        io::ErrorKind::NotFound => Error::command_not_found(command.display().to_string(), e),
        _ => Error::io(e),
    }
}

impl From<Report> for Error {
    fn from(e: Report) -> Self {
        Error::generic(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::io(e)
    }
}
