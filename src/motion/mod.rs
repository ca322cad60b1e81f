//! Probe motion: command decoding

pub mod commands;

pub use commands::ProbeCommand;
