/*!
   Functions for bootstrapping the test environment.
*/

pub mod environment;
pub mod init;
pub mod relays;
pub mod wallet;
