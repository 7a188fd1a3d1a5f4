#[allow(non_snake_case)]
pub mod Kinetics;
pub mod cli;
pub mod settings;
