/*!
   Framework for running tests inside a test session.
*/

pub mod base;
pub mod session;
