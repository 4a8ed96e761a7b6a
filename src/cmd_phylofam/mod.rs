//! Subcommand modules for the `phylofam` binary.

pub mod fam;
pub mod mat;
pub mod nwk;
pub mod pl;
