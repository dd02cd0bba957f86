//! Scripts Share core library — descriptor loading, the project/type index,
//! configuration and initialization shared by the CLI and any UI front end.

pub mod config;
pub mod init;
pub mod scripts;
