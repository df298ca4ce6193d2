//! `sh-cli` subcommands.

pub mod migrate;
pub mod replay;
pub mod token;
