/*!
   Data types used by the environment bootstrap and session.
*/

pub mod config;
pub mod env;
pub mod process;
pub mod relay;
