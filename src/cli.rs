//! command-line entry point of the rate report
pub mod cli_main;
