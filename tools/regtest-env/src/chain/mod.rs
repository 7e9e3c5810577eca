/*!
   Constructs for driving the regtest bitcoind through its command line
   binaries.
*/

pub mod cli;
pub mod driver;
pub mod exec;
pub mod version;
