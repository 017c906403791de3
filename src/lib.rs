//! wavstream library crate
//!
//! Opens RIFF/WAVE files and streams their PCM payload by frame count or by
//! time. The binary in main.rs feeds the samples to a paced playback loop.

#[macro_use]
extern crate log;

pub mod config;
pub mod constants;
pub mod error;
pub mod playback;
pub mod riff;
pub mod sources;
pub mod wave;

pub use error::{Result, WaveError};
pub use riff::{OpenOptions, WaveFormat};
pub use wave::{FrameBlock, WaveFile};

#[cfg(test)]
mod test_fixtures;
