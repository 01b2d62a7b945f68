//! FM synth CLI library.
//!
//! This crate provides the command implementations behind the `fmsynth`
//! binary, plus WAV export of rendered buffers.

pub mod commands;
pub mod wav;
