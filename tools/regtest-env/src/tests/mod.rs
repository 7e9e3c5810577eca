/*!
   Tests driving the bootstrap and the session lifecycle through a
   launcher that records invocations instead of running binaries.
*/

pub mod recording;

mod bootstrap;
