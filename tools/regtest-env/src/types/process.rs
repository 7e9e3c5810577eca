/*!
   Handles for processes launched in the background.
*/

use std::process::Child;

use crate::error::Error;

/**
   The only capability the environment needs over a background process:
   killing it unconditionally at teardown.
*/
pub trait Terminate {
    fn kill(&mut self) -> Result<(), Error>;
}

/**
   A lightweight wrapper around [`std::process::Child`] that makes sure the
   process is killed and reaped when the handle is dropped.
*/
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    waited: bool,
}

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        Self {
            child,
            waited: false,
        }
    }

    pub fn wait(&mut self) -> Result<(), Error> {
        if !self.waited {
            self.waited = true;
            self.child.wait()?;
        }

        Ok(())
    }
}

impl Terminate for ChildProcess {
    fn kill(&mut self) -> Result<(), Error> {
        if self.waited {
            return Ok(());
        }

        // A process that already exited on its own only needs reaping.
        if let Err(e) = self.child.kill() {
            if self.child.try_wait()?.is_none() {
                return Err(e.into());
            }
        }

        self.wait()
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if !self.waited {
            let _ = self.kill();
        }
    }
}
