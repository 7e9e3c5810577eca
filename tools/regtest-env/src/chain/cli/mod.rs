/*!
   Functions that drive bitcoind and bitcoin-cli invocations.
*/

pub mod daemon;
pub mod version;
pub mod wallet;
